//! Handlers for `/comments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/comments/:alias/:key` | Optional `offset`, `limit`; returns a page |
//! | `POST` | `/comments/:alias/:key` | Body: `{"body":"..."}`; author from the identity header; returns 201 |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use remark_core::{
  comment::{Comment, NewComment},
  key::EntityKey,
  page::{Page, PageRequest},
  store::CommentStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, identity::Author};

/// Map an alias from the URL to the entity type it is bound to.
fn entity_type_for<'s, S: CommentStore>(
  state: &'s ApiState<S>,
  alias: &str,
) -> Result<&'s str, ApiError> {
  state
    .store
    .registry()
    .entity_type_for(alias)
    .ok_or_else(|| ApiError::NotFound(format!("no commentable type {alias:?}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  #[serde(default)]
  pub offset: usize,
  /// Defaults to the configured page size; capped at the configured maximum.
  pub limit:  Option<usize>,
}

/// `GET /comments/:alias/:key[?offset=...][&limit=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path((alias, key)): Path<(String, String)>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Comment>>, ApiError>
where
  S: CommentStore + 'static,
{
  let entity_type = entity_type_for(&state, &alias)?;
  let limit = params
    .limit
    .unwrap_or(state.config.default_page_size)
    .min(state.config.max_page_size);

  let page = state
    .store
    .list_comments_for(entity_type, &EntityKey::from(key), PageRequest::new(params.offset, limit))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub body: String,
}

/// `POST /comments/:alias/:key`: returns 201 + the stored [`Comment`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path((alias, key)): Path<(String, String)>,
  Author(author): Author,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CommentStore + 'static,
{
  let entity_type = entity_type_for(&state, &alias)?;
  let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
  let comment = state
    .store
    .create_comment(NewComment::new(entity_type, key, author, body.body))
    .await
    .map_err(ApiError::store)?;

  tracing::info!(comment_id = %comment.comment_id, %alias, "comment posted");
  Ok((StatusCode::CREATED, Json(comment)))
}
