//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width,
//! so lexical order matches chronological order. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use remark_core::{
  comment::Comment,
  key::{AuthorId, EntityKey},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub type_alias: String,
  pub entity_key: String,
  pub author:     String,
  pub body:       String,
  pub created_at: String,
}

impl RawComment {
  /// Column order matches `COMMENT_COLUMNS` in the schema module.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      type_alias: row.get(1)?,
      entity_key: row.get(2)?,
      author:     row.get(3)?,
      body:       row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      type_alias: self.type_alias,
      entity_key: EntityKey::from(self.entity_key),
      author:     AuthorId::from(self.author),
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
