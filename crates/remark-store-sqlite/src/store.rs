//! [`SqliteStore`]: the SQLite implementation of [`CommentStore`].

use std::{path::Path, sync::Arc};

use chrono::{SubsecRound as _, Utc};
use remark_core::{
  comment::{Comment, NewComment},
  key::EntityKey,
  page::{CommentOrder, Page, PageRequest},
  registry::EntityRegistry,
  store::CommentStore,
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawComment, encode_dt, encode_uuid},
  schema::{self, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Remark comment store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and registry are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  registry:        Arc<EntityRegistry>,
  order:           CommentOrder,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation,
  /// including a junction table for every binding that configures one.
  pub async fn open(path: impl AsRef<Path>, registry: Arc<EntityRegistry>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, registry, order: CommentOrder::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory(registry: Arc<EntityRegistry>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, registry, order: CommentOrder::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Set the order in which [`list_comments_for`](CommentStore::list_comments_for)
  /// returns comments. Oldest first unless changed.
  pub fn with_order(mut self, order: CommentOrder) -> Self {
    self.order = order;
    self
  }

  pub fn order(&self) -> CommentOrder { self.order }

  async fn init_schema(&self) -> Result<()> {
    let junction_ddl: Vec<String> = self
      .registry
      .bindings()
      .filter_map(|b| b.junction().ok())
      .map(|j| schema::junction_table(&j))
      .collect();

    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        for ddl in &junction_ddl {
          conn.execute_batch(ddl)?;
        }
        Ok(())
      })
      .await?;

    tracing::debug!(bindings = self.registry.len(), "schema initialised");
    Ok(())
  }
}

// ─── CommentStore impl ───────────────────────────────────────────────────────

impl CommentStore for SqliteStore {
  type Error = crate::Error;

  fn registry(&self) -> &EntityRegistry { &self.registry }

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let binding = self.registry.binding(&input.entity_type)?;
    input.validate()?;
    let junction = binding.junction()?;

    let comment = Comment {
      comment_id: Uuid::new_v4(),
      type_alias: binding.alias.clone(),
      entity_key: input.entity_key,
      author:     input.author,
      body:       input.body,
      created_at: Utc::now().trunc_subsecs(6),
    };

    let insert_link = schema::insert_link(&junction);
    let id_str      = encode_uuid(comment.comment_id);
    let alias       = comment.type_alias.clone();
    let key_str     = comment.entity_key.as_str().to_owned();
    let author      = comment.author.as_str().to_owned();
    let body        = comment.body.clone();
    let at_str      = encode_dt(comment.created_at);

    // Dropping the transaction without committing rolls both inserts back.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO comments (comment_id, type_alias, entity_key, author, body, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, alias, key_str, author, body, at_str],
        )?;
        tx.execute(&insert_link, rusqlite::params![id_str, key_str])?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(
      comment_id = %comment.comment_id,
      alias = %comment.type_alias,
      key = %comment.entity_key,
      "comment created"
    );
    Ok(comment)
  }

  async fn list_comments_for(
    &self,
    entity_type: &str,
    entity_key:  &EntityKey,
    page:        PageRequest,
  ) -> Result<Page<Comment>> {
    let binding  = self.registry.binding(entity_type)?;
    let junction = binding.junction()?;

    let count_sql  = schema::count_comments(&junction);
    let select_sql = schema::select_comments(&junction, self.order);
    let key_str    = entity_key.as_str().to_owned();
    let alias      = binding.alias.clone();
    let limit_val  = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(page.offset).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawComment>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params![key_str, alias],
          |row| row.get(0),
        )?;

        if limit_val == 0 {
          return Ok((total, vec![]));
        }

        let mut stmt = conn.prepare(&select_sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![key_str, alias, limit_val, offset_val],
            RawComment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawComment::into_comment)
      .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
      alias = %binding.alias,
      key = %entity_key,
      total,
      returned = items.len(),
      "comments listed"
    );
    Ok(Page::new(items, usize::try_from(total).unwrap_or_default(), page))
  }
}
