//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use remark_core::{ErrorKind, HasErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing identity header {0:?}")]
  Unauthorized(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {source}")]
  Store {
    kind:   ErrorKind,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + HasErrorKind + Send + Sync + 'static,
  {
    ApiError::Store { kind: e.kind(), source: Box::new(e) }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store { kind, .. } => match kind {
        ErrorKind::UnregisteredEntityType => StatusCode::NOT_FOUND,
        ErrorKind::InvalidCommentInput => StatusCode::BAD_REQUEST,
        ErrorKind::MissingJunctionConfiguration
        | ErrorKind::InvalidBinding
        | ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn kind_label(&self) -> Option<ErrorKind> {
    match self {
      ApiError::Store { kind, .. } => Some(*kind),
      _ => None,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let message = match &self {
      ApiError::Store { source, .. } => source.to_string(),
      other => other.to_string(),
    };
    (status, Json(json!({ "error": message, "kind": self.kind_label() }))).into_response()
  }
}
