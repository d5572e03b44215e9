//! Handler for `GET /types`, listing the commentable entity types clients may address.

use axum::{Json, extract::State};
use remark_core::store::CommentStore;
use serde::Serialize;

use crate::ApiState;

#[derive(Debug, Serialize)]
pub struct TypeSummary {
  pub alias:       String,
  pub entity_type: String,
}

/// `GET /types`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Json<Vec<TypeSummary>>
where
  S: CommentStore + 'static,
{
  Json(
    state
      .store
      .registry()
      .bindings()
      .map(|b| TypeSummary { alias: b.alias.clone(), entity_type: b.entity_type.clone() })
      .collect(),
  )
}
