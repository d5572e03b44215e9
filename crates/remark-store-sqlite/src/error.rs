//! Error type for `remark-store-sqlite`.

use remark_core::{ErrorKind, HasErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] remark_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl HasErrorKind for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Database(_) | Error::Uuid(_) | Error::DateParse(_) => ErrorKind::StorageFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
