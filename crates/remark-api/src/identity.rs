//! Author extraction.
//!
//! Authentication happens upstream: an identity-aware proxy (or the
//! application embedding this router) authenticates the user and forwards
//! their id in a trusted header. Requests without it are rejected.

use axum::{extract::FromRequestParts, http::request::Parts};
use remark_core::{key::AuthorId, store::CommentStore};

use crate::{ApiState, error::ApiError};

/// The authenticated author of the current request.
#[derive(Debug, Clone)]
pub struct Author(pub AuthorId);

/// Read the author id from `header`, ignoring blank values.
pub fn author_from_parts(parts: &Parts, header: &str) -> Option<AuthorId> {
  parts
    .headers
    .get(header)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(AuthorId::from)
}

impl<S> FromRequestParts<ApiState<S>> for Author
where
  S: CommentStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = state.config.user_header.as_str();
    match author_from_parts(parts, header) {
      Some(id) => Ok(Author(id)),
      None => {
        tracing::warn!(header, path = %parts.uri.path(), "request without author identity");
        Err(ApiError::Unauthorized(header.to_owned()))
      }
    }
  }
}
