//! JSON REST API for Remark.
//!
//! Exposes an axum [`Router`] backed by any [`remark_core::store::CommentStore`].
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility; the author of a new comment is read from a trusted header
//! (see [`identity`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", remark_api::api_router(store.clone(), ApiConfig::default()))
//! ```

pub mod comments;
pub mod error;
pub mod identity;
pub mod types;

use std::sync::Arc;

use axum::{Router, routing::get};
use remark_core::{page::DEFAULT_PAGE_SIZE, store::CommentStore};

pub use error::ApiError;

/// Header carrying the authenticated user id unless configured otherwise.
pub const DEFAULT_USER_HEADER: &str = "x-remark-user";

/// Request-handling settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub user_header:       String,
  pub default_page_size: usize,
  pub max_page_size:     usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      user_header:       DEFAULT_USER_HEADER.to_owned(),
      default_page_size: DEFAULT_PAGE_SIZE,
      max_page_size:     100,
    }
  }
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: Arc::clone(&self.config) }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, config: ApiConfig) -> Router<()>
where
  S: CommentStore + 'static,
{
  let state = ApiState { store, config: Arc::new(config) };
  Router::new()
    .route("/types", get(types::list::<S>))
    .route("/comments/{alias}/{key}", get(comments::list::<S>).post(comments::create::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use remark_core::registry::{EntityRegistry, EntityTypeBinding};
  use remark_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn make_router() -> Router {
    let registry = EntityRegistry::new([
      EntityTypeBinding::new("task", "Task").with_junction(
        "tasks_comments_nm",
        "commentId",
        "taskId",
      ),
      EntityTypeBinding::new("note", "Note"),
    ])
    .unwrap();
    let store = SqliteStore::open_in_memory(Arc::new(registry)).await.unwrap();
    api_router(Arc::new(store), ApiConfig { max_page_size: 3, ..ApiConfig::default() })
  }

  async fn send(
    router: &Router,
    method: &str,
    uri:    &str,
    user:   Option<&str>,
    body:   Option<&str>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
      builder = builder.header(DEFAULT_USER_HEADER, u);
    }
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
      .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  #[tokio::test]
  async fn post_then_get() {
    let router = make_router().await;

    let (status, created) = send(
      &router,
      "POST",
      "/comments/task/42",
      Some("user-7"),
      Some(r#"{"body":"looks good"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type_alias"], "task");
    assert_eq!(created["entity_key"], "42");
    assert_eq!(created["author"], "user-7");

    let (status, page) = send(&router, "GET", "/comments/task/42", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["body"], "looks good");
    assert_eq!(page["items"][0]["comment_id"], created["comment_id"]);
  }

  #[tokio::test]
  async fn post_without_identity_is_unauthorized() {
    let router = make_router().await;
    let (status, _) =
      send(&router, "POST", "/comments/task/1", None, Some(r#"{"body":"hi"}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, page) = send(&router, "GET", "/comments/task/1", None, None).await;
    assert_eq!(page["total"], 0);
  }

  #[tokio::test]
  async fn unknown_alias_is_404() {
    let router = make_router().await;
    let (status, _) = send(&router, "GET", "/comments/invoice/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
      send(&router, "POST", "/comments/invoice/1", Some("u"), Some(r#"{"body":"hi"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn empty_body_is_400() {
    let router = make_router().await;
    let (status, err) =
      send(&router, "POST", "/comments/task/1", Some("u"), Some(r#"{"body":"  "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "invalid_comment_input");
  }

  #[tokio::test]
  async fn malformed_json_body_is_400() {
    let router = make_router().await;
    for body in ["{}", "not json"] {
      let (status, err) =
        send(&router, "POST", "/comments/task/1", Some("u"), Some(body)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
      assert!(err["error"].is_string(), "body {body:?}: {err}");
    }

    let (_, page) = send(&router, "GET", "/comments/task/1", None, None).await;
    assert_eq!(page["total"], 0);
  }

  #[tokio::test]
  async fn blank_identity_is_unauthorized() {
    let router = make_router().await;
    let (status, err) =
      send(&router, "POST", "/comments/task/1", Some("   "), Some(r#"{"body":"hi"}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(err["error"].is_string());
  }

  #[tokio::test]
  async fn missing_junction_is_500() {
    let router = make_router().await;
    let (status, err) = send(&router, "GET", "/comments/note/1", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err["kind"], "missing_junction_configuration");
  }

  #[tokio::test]
  async fn limit_is_capped() {
    let router = make_router().await;
    for i in 0..5 {
      let body = format!(r#"{{"body":"c{i}"}}"#);
      send(&router, "POST", "/comments/task/8", Some("u"), Some(body.as_str())).await;
    }

    let (_, page) = send(&router, "GET", "/comments/task/8?limit=50", None, None).await;
    assert_eq!(page["total"], 5);
    assert_eq!(page["limit"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 3);

    let (_, page) = send(&router, "GET", "/comments/task/8?offset=3", None, None).await;
    assert_eq!(page["items"][0]["body"], "c3");
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn lists_registered_types() {
    let router = make_router().await;
    let (status, types) = send(&router, "GET", "/types", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(types[0]["alias"], "task");
    assert_eq!(types[0]["entity_type"], "Task");
    assert_eq!(types[1]["alias"], "note");
  }
}
