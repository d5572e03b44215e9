//! Comment records and the [`Commentable`] trait for owning entity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  key::{AuthorId, EntityKey},
};

// ─── Persisted comment ───────────────────────────────────────────────────────

/// A comment attached to exactly one owning entity. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  /// Alias of the owning entity's type, e.g. `"task"`.
  pub type_alias: String,
  pub entity_key: EntityKey,
  pub author:     AuthorId,
  pub body:       String,
  /// Server-assigned, microsecond precision.
  pub created_at: DateTime<Utc>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`CommentStore::create_comment`](crate::store::CommentStore::create_comment).
/// The id and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  /// Fully-qualified name of the owning entity's type, e.g. `"Task"`.
  pub entity_type: String,
  pub entity_key:  EntityKey,
  pub author:      AuthorId,
  pub body:        String,
}

impl NewComment {
  pub fn new(
    entity_type: impl Into<String>,
    entity_key: impl Into<EntityKey>,
    author: impl Into<AuthorId>,
    body: impl Into<String>,
  ) -> Self {
    Self {
      entity_type: entity_type.into(),
      entity_key:  entity_key.into(),
      author:      author.into(),
      body:        body.into(),
    }
  }

  /// Reject inputs that must never be persisted.
  pub fn validate(&self) -> Result<()> {
    if self.entity_key.is_empty() {
      return Err(Error::InvalidCommentInput("entity key must not be empty".into()));
    }
    if self.body.trim().is_empty() {
      return Err(Error::InvalidCommentInput("comment body must not be empty".into()));
    }
    if self.author.as_str().trim().is_empty() {
      return Err(Error::InvalidCommentInput("author must not be empty".into()));
    }
    Ok(())
  }
}

// ─── Owning entities ─────────────────────────────────────────────────────────

/// Implemented by domain types that can receive comments.
///
/// The type name must match the `entity_type` of a binding in the
/// [`EntityRegistry`](crate::registry::EntityRegistry).
pub trait Commentable {
  const ENTITY_TYPE: &'static str;

  fn entity_key(&self) -> EntityKey;

  /// An unsaved comment addressed to this entity.
  fn new_comment(
    &self,
    author: impl Into<AuthorId>,
    body: impl Into<String>,
  ) -> NewComment {
    NewComment::new(Self::ENTITY_TYPE, self.entity_key(), author, body)
  }
}
