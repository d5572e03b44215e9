//! Error types for `remark-core`.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no alias registered for entity type {0:?}")]
  UnregisteredEntityType(String),

  #[error("no entity type registered for alias {0:?}")]
  UnknownAlias(String),

  #[error("entity type {0:?} has no junction table and related column configured")]
  MissingJunctionConfiguration(String),

  #[error("invalid comment input: {0}")]
  InvalidCommentInput(String),

  #[error("invalid entity type binding: {0}")]
  InvalidBinding(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of a failure, for callers that branch on the kind of
/// error rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  UnregisteredEntityType,
  MissingJunctionConfiguration,
  InvalidCommentInput,
  InvalidBinding,
  StorageFailure,
}

/// Implemented by every error type a [`CommentStore`](crate::store::CommentStore)
/// may return.
pub trait HasErrorKind {
  fn kind(&self) -> ErrorKind;
}

impl HasErrorKind for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::UnregisteredEntityType(_) | Error::UnknownAlias(_) => {
        ErrorKind::UnregisteredEntityType
      }
      Error::MissingJunctionConfiguration(_) => {
        ErrorKind::MissingJunctionConfiguration
      }
      Error::InvalidCommentInput(_) => ErrorKind::InvalidCommentInput,
      Error::InvalidBinding(_) => ErrorKind::InvalidBinding,
    }
  }
}
