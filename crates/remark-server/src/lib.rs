//! Server wiring for Remark: configuration, registry construction, and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use remark_api::{ApiConfig, DEFAULT_USER_HEADER};
use remark_core::{
  page::{CommentOrder, DEFAULT_PAGE_SIZE},
  registry::{DEFAULT_COMMENT_COLUMN, EntityRegistry, EntityTypeBinding, JunctionConfig},
  store::CommentStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// One commentable entity type, as written in `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct BindingConfig {
  pub alias:                   String,
  pub entity_type:             String,
  pub junction_table:          Option<String>,
  #[serde(default = "default_comment_column")]
  pub junction_comment_column: String,
  pub junction_related_column: Option<String>,
}

impl From<BindingConfig> for EntityTypeBinding {
  fn from(c: BindingConfig) -> Self {
    EntityTypeBinding {
      alias:       c.alias,
      entity_type: c.entity_type,
      junction:    JunctionConfig {
        table:          c.junction_table,
        comment_column: c.junction_comment_column,
        related_column: c.junction_related_column,
      },
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `REMARK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  pub store_path:        PathBuf,
  #[serde(default = "default_user_header")]
  pub user_header:       String,
  #[serde(default)]
  pub order:             CommentOrder,
  #[serde(default = "default_page_size")]
  pub default_page_size: usize,
  #[serde(default = "default_max_page_size")]
  pub max_page_size:     usize,
  #[serde(default)]
  pub bindings:          Vec<BindingConfig>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_user_header() -> String { DEFAULT_USER_HEADER.to_owned() }
fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
fn default_max_page_size() -> usize { 100 }
fn default_comment_column() -> String { DEFAULT_COMMENT_COLUMN.to_owned() }

impl ServerConfig {
  /// Validate the configured bindings and build the registry.
  pub fn registry(&self) -> remark_core::Result<EntityRegistry> {
    EntityRegistry::new(self.bindings.iter().cloned().map(EntityTypeBinding::from))
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      user_header:       self.user_header.to_ascii_lowercase(),
      default_page_size: self.default_page_size.min(self.max_page_size),
      max_page_size:     self.max_page_size,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CommentStore + 'static,
{
  remark_api::api_router(store, config.api_config()).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{body::Body, http::Request};
  use config::{Config, File, FileFormat};
  use remark_core::Error;
  use remark_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  const SAMPLE: &str = r#"
store_path = ":memory:"
order = "newest_first"
max_page_size = 10

[[bindings]]
alias = "task"
entity_type = "Task"
junction_table = "tasks_comments_nm"
junction_related_column = "taskId"

[[bindings]]
alias = "note"
entity_type = "Note"
"#;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_fill_in() {
    let cfg = parse(SAMPLE);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.user_header, DEFAULT_USER_HEADER);
    assert_eq!(cfg.order, CommentOrder::NewestFirst);

    let api = cfg.api_config();
    assert_eq!(api.max_page_size, 10);
    assert_eq!(api.default_page_size, 10);
  }

  #[test]
  fn bindings_become_registry() {
    let registry = parse(SAMPLE).registry().unwrap();
    assert_eq!(registry.resolve_alias("Task").unwrap(), "task");

    let junction = registry.binding("Task").unwrap().junction().unwrap();
    assert_eq!(junction.comment_column, DEFAULT_COMMENT_COLUMN);
    assert_eq!(junction.related_column, "taskId");

    assert!(matches!(
      registry.binding("Note").unwrap().junction(),
      Err(Error::MissingJunctionConfiguration(_))
    ));
  }

  #[test]
  fn invalid_binding_is_rejected() {
    let cfg = parse(
      r#"
store_path = ":memory:"
[[bindings]]
alias = "Task"
entity_type = "Task"
"#,
    );
    assert!(matches!(cfg.registry(), Err(Error::InvalidBinding(_))));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/remark.db")), PathBuf::from(home).join("remark.db"));
    assert_eq!(expand_tilde(Path::new("/var/remark.db")), PathBuf::from("/var/remark.db"));
  }

  #[tokio::test]
  async fn app_serves_types() {
    let cfg = parse(SAMPLE);
    let store = SqliteStore::open_in_memory(Arc::new(cfg.registry().unwrap()))
      .await
      .unwrap()
      .with_order(cfg.order);

    let resp = app(Arc::new(store), &cfg)
      .oneshot(Request::builder().uri("/types").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert!(resp.status().is_success());

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let types: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(types.as_array().unwrap().len(), 2);
  }
}
