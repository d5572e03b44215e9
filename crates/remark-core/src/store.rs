//! The `CommentStore` trait.
//!
//! Implemented by storage backends (e.g. `remark-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  comment::{Comment, Commentable, NewComment},
  error::HasErrorKind,
  key::{AuthorId, EntityKey},
  page::{Page, PageRequest},
  registry::EntityRegistry,
};

/// Abstraction over a Remark comment store backend.
///
/// Comments are append-only: there is no update or delete. Every operation
/// resolves the entity type through [`CommentStore::registry`] first and fails
/// with an `UnregisteredEntityType` error if it is not bound.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CommentStore: Send + Sync {
  type Error: std::error::Error + HasErrorKind + Send + Sync + 'static;

  /// The bindings this store was opened with.
  fn registry(&self) -> &EntityRegistry;

  /// Persist a comment and its junction link atomically.
  ///
  /// Fails with `InvalidCommentInput` for an empty key, author or body, and
  /// with `MissingJunctionConfiguration` if the entity type has no junction
  /// relation. Nothing is written when an error is returned.
  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// List the comments attached to one entity through its junction relation,
  /// together with the total number of matches.
  fn list_comments_for<'a>(
    &'a self,
    entity_type: &'a str,
    entity_key: &'a EntityKey,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Comment>, Self::Error>> + Send + 'a;

  // ── Conveniences for `Commentable` types ──────────────────────────────

  fn comment_on<E: Commentable>(
    &self,
    entity: &E,
    author: impl Into<AuthorId>,
    body: impl Into<String>,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_ {
    self.create_comment(entity.new_comment(author, body))
  }

  fn comments_of<E: Commentable>(
    &self,
    entity: &E,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Comment>, Self::Error>> + Send + '_ {
    let key = entity.entity_key();
    async move { self.list_comments_for(E::ENTITY_TYPE, &key, page).await }
  }
}
