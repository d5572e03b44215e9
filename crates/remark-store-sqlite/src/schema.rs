//! SQL for the Remark SQLite store.
//!
//! The fixed schema is executed once at connection startup. Junction tables
//! and the queries that join through them are generated per binding; their
//! identifiers come from the registry, which only admits plain SQL
//! identifiers, and are double-quoted on top of that. Values are always bound
//! as parameters.

use remark_core::{page::CommentOrder, registry::JunctionRelation};

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Comments are strictly append-only.
-- `seq` breaks ties between comments created in the same microsecond.
CREATE TABLE IF NOT EXISTS comments (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    comment_id  TEXT NOT NULL UNIQUE,
    type_alias  TEXT NOT NULL,
    entity_key  TEXT NOT NULL CHECK (length(trim(entity_key)) > 0),
    author      TEXT NOT NULL,
    body        TEXT NOT NULL CHECK (length(trim(body)) > 0),
    created_at  TEXT NOT NULL   -- RFC 3339 UTC, fixed microsecond width
);

CREATE INDEX IF NOT EXISTS comments_created_idx ON comments(created_at, seq);

PRAGMA user_version = 1;
";

const COMMENT_COLUMNS: &str =
  "c.comment_id, c.type_alias, c.entity_key, c.author, c.body, c.created_at";

pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

/// DDL for one binding's junction table.
pub fn junction_table(j: &JunctionRelation<'_>) -> String {
  let table   = quote_ident(j.table);
  let comment = quote_ident(j.comment_column);
  let related = quote_ident(j.related_column);
  format!(
    "CREATE TABLE IF NOT EXISTS {table} (
         {comment} TEXT NOT NULL UNIQUE REFERENCES comments(comment_id),
         {related} TEXT NOT NULL,
         PRIMARY KEY ({related}, {comment})
     );"
  )
}

/// `?1` comment id, `?2` entity key.
pub fn insert_link(j: &JunctionRelation<'_>) -> String {
  format!(
    "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
    quote_ident(j.table),
    quote_ident(j.comment_column),
    quote_ident(j.related_column),
  )
}

fn join_clause(j: &JunctionRelation<'_>) -> String {
  format!(
    "FROM comments c
     JOIN {} cm ON cm.{} = c.comment_id
     WHERE cm.{} = ?1 AND c.type_alias = ?2",
    quote_ident(j.table),
    quote_ident(j.comment_column),
    quote_ident(j.related_column),
  )
}

/// `?1` entity key, `?2` type alias.
pub fn count_comments(j: &JunctionRelation<'_>) -> String {
  format!("SELECT COUNT(*) {}", join_clause(j))
}

/// `?1` entity key, `?2` type alias, `?3` limit, `?4` offset.
pub fn select_comments(j: &JunctionRelation<'_>, order: CommentOrder) -> String {
  let dir = match order {
    CommentOrder::OldestFirst => "ASC",
    CommentOrder::NewestFirst => "DESC",
  };
  format!(
    "SELECT {COMMENT_COLUMNS} {}
     ORDER BY c.created_at {dir}, c.seq {dir}
     LIMIT ?3 OFFSET ?4",
    join_clause(j),
  )
}
