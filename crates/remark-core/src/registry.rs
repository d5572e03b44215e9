//! The entity registry: which entity types may receive comments, under which
//! alias, and through which junction table.
//!
//! Built once at startup from static configuration and never mutated. Table
//! and column names are validated here as plain SQL identifiers, so storage
//! backends may splice them into queries after quoting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Column holding the comment id when a binding does not name one.
pub const DEFAULT_COMMENT_COLUMN: &str = "commentId";

// ─── Junction configuration ──────────────────────────────────────────────────

/// Junction table settings as configured. The table and related-entity column
/// have no sensible default and may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionConfig {
  pub table:          Option<String>,
  #[serde(default = "default_comment_column")]
  pub comment_column: String,
  pub related_column: Option<String>,
}

fn default_comment_column() -> String { DEFAULT_COMMENT_COLUMN.to_owned() }

impl Default for JunctionConfig {
  fn default() -> Self {
    Self {
      table:          None,
      comment_column: default_comment_column(),
      related_column: None,
    }
  }
}

/// A fully-specified junction relation, borrowed from its binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionRelation<'a> {
  pub table:          &'a str,
  /// Column holding the comment id.
  pub comment_column: &'a str,
  /// Column holding the owning entity's primary key.
  pub related_column: &'a str,
}

// ─── Binding ─────────────────────────────────────────────────────────────────

/// Associates an alias with an entity type and its junction relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeBinding {
  pub alias:       String,
  pub entity_type: String,
  #[serde(default)]
  pub junction:    JunctionConfig,
}

impl EntityTypeBinding {
  /// A binding with no junction relation configured yet.
  pub fn new(alias: impl Into<String>, entity_type: impl Into<String>) -> Self {
    Self {
      alias:       alias.into(),
      entity_type: entity_type.into(),
      junction:    JunctionConfig::default(),
    }
  }

  pub fn with_junction(
    mut self,
    table: impl Into<String>,
    comment_column: impl Into<String>,
    related_column: impl Into<String>,
  ) -> Self {
    self.junction = JunctionConfig {
      table:          Some(table.into()),
      comment_column: comment_column.into(),
      related_column: Some(related_column.into()),
    };
    self
  }

  /// The junction relation, or [`Error::MissingJunctionConfiguration`] when
  /// the table or related column is not configured.
  pub fn junction(&self) -> Result<JunctionRelation<'_>> {
    match (&self.junction.table, &self.junction.related_column) {
      (Some(table), Some(related)) => Ok(JunctionRelation {
        table,
        comment_column: &self.junction.comment_column,
        related_column: related,
      }),
      _ => Err(Error::MissingJunctionConfiguration(self.entity_type.clone())),
    }
  }

  fn validate(&self) -> Result<()> {
    let alias_ok = !self.alias.is_empty()
      && self
        .alias
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !alias_ok {
      return Err(Error::InvalidBinding(format!(
        "alias {:?} must be non-empty lowercase ascii",
        self.alias
      )));
    }
    if self.entity_type.trim().is_empty() {
      return Err(Error::InvalidBinding(format!(
        "alias {:?} has an empty entity type",
        self.alias
      )));
    }

    let JunctionConfig { table, comment_column, related_column } = &self.junction;
    for name in table.iter().chain(Some(comment_column)).chain(related_column) {
      if !is_sql_identifier(name) {
        return Err(Error::InvalidBinding(format!(
          "{name:?} in binding {:?} is not a plain SQL identifier",
          self.alias
        )));
      }
    }
    if related_column.as_deref() == Some(comment_column.as_str()) {
      return Err(Error::InvalidBinding(format!(
        "binding {:?} uses {comment_column:?} for both junction columns",
        self.alias
      )));
    }
    Ok(())
  }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The immutable set of alias ↔ entity type bindings.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
  bindings: Vec<EntityTypeBinding>,
  by_type:  HashMap<String, usize>,
  by_alias: HashMap<String, usize>,
}

impl EntityRegistry {
  /// Build a registry, rejecting malformed or duplicate bindings.
  pub fn new(bindings: impl IntoIterator<Item = EntityTypeBinding>) -> Result<Self> {
    let mut registry = Self::default();

    for binding in bindings {
      binding.validate()?;
      let index = registry.bindings.len();
      if registry.by_alias.insert(binding.alias.clone(), index).is_some() {
        return Err(Error::InvalidBinding(format!(
          "alias {:?} is bound more than once",
          binding.alias
        )));
      }
      if registry.by_type.insert(binding.entity_type.clone(), index).is_some() {
        return Err(Error::InvalidBinding(format!(
          "entity type {:?} is bound more than once",
          binding.entity_type
        )));
      }
      registry.bindings.push(binding);
    }

    Ok(registry)
  }

  /// The alias bound to `entity_type`.
  pub fn resolve_alias(&self, entity_type: &str) -> Result<&str> {
    Ok(&self.binding(entity_type)?.alias)
  }

  pub fn validate_alias(&self, alias: &str) -> bool { self.by_alias.contains_key(alias) }

  /// Reverse of [`resolve_alias`](Self::resolve_alias).
  pub fn entity_type_for(&self, alias: &str) -> Option<&str> {
    self.by_alias.get(alias).map(|&i| self.bindings[i].entity_type.as_str())
  }

  pub fn binding(&self, entity_type: &str) -> Result<&EntityTypeBinding> {
    self
      .by_type
      .get(entity_type)
      .map(|&i| &self.bindings[i])
      .ok_or_else(|| Error::UnregisteredEntityType(entity_type.to_owned()))
  }

  pub fn binding_for_alias(&self, alias: &str) -> Result<&EntityTypeBinding> {
    self
      .by_alias
      .get(alias)
      .map(|&i| &self.bindings[i])
      .ok_or_else(|| Error::UnknownAlias(alias.to_owned()))
  }

  /// All bindings, in configuration order.
  pub fn bindings(&self) -> impl Iterator<Item = &EntityTypeBinding> { self.bindings.iter() }

  pub fn len(&self) -> usize { self.bindings.len() }

  pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn task() -> EntityTypeBinding {
    EntityTypeBinding::new("task", "Task").with_junction("tasks_comments_nm", "commentId", "taskId")
  }

  fn registry() -> EntityRegistry {
    EntityRegistry::new([
      task(),
      EntityTypeBinding::new("project", "app::Project").with_junction(
        "projects_comments_nm",
        "commentId",
        "projectId",
      ),
    ])
    .unwrap()
  }

  #[test]
  fn alias_round_trips_for_every_binding() {
    let r = registry();
    for b in r.bindings() {
      let ty = r.entity_type_for(&b.alias).unwrap();
      assert_eq!(r.resolve_alias(ty).unwrap(), b.alias);
    }
    assert_eq!(r.len(), 2);
  }

  #[test]
  fn unregistered_type_fails() {
    let err = registry().resolve_alias("Invoice").unwrap_err();
    assert!(matches!(err, Error::UnregisteredEntityType(t) if t == "Invoice"));
  }

  #[test]
  fn validate_alias_checks_membership() {
    let r = registry();
    assert!(r.validate_alias("task"));
    assert!(!r.validate_alias("Task"));
    assert!(!r.validate_alias("invoice"));
    assert!(matches!(r.binding_for_alias("invoice"), Err(Error::UnknownAlias(_))));
  }

  #[test]
  fn junction_requires_table_and_related_column() {
    let bare = EntityTypeBinding::new("note", "Note");
    assert!(matches!(bare.junction(), Err(Error::MissingJunctionConfiguration(t)) if t == "Note"));

    let binding = task();
    let junction = binding.junction().unwrap();
    assert_eq!(junction.table, "tasks_comments_nm");
    assert_eq!(junction.comment_column, "commentId");
    assert_eq!(junction.related_column, "taskId");
  }

  #[test]
  fn comment_column_defaults_when_deserialized() {
    let junction: JunctionConfig =
      serde_json::from_str(r#"{"table":"t","related_column":"taskId"}"#).unwrap();
    assert_eq!(junction.comment_column, DEFAULT_COMMENT_COLUMN);
  }

  #[test]
  fn rejects_uppercase_alias() {
    let err = EntityRegistry::new([EntityTypeBinding::new("Task", "Task")]).unwrap_err();
    assert!(matches!(err, Error::InvalidBinding(_)));
  }

  #[test]
  fn rejects_duplicate_alias_and_type() {
    let dup_alias = EntityRegistry::new([task(), EntityTypeBinding::new("task", "Other")]);
    assert!(matches!(dup_alias, Err(Error::InvalidBinding(_))));

    let dup_type = EntityRegistry::new([task(), EntityTypeBinding::new("todo", "Task")]);
    assert!(matches!(dup_type, Err(Error::InvalidBinding(_))));
  }

  #[test]
  fn rejects_non_identifier_table_names() {
    let evil = EntityTypeBinding::new("task", "Task").with_junction(
      "tasks; DROP TABLE comments",
      "commentId",
      "taskId",
    );
    assert!(matches!(EntityRegistry::new([evil]), Err(Error::InvalidBinding(_))));
  }

  #[test]
  fn rejects_identical_junction_columns() {
    let b = EntityTypeBinding::new("task", "Task").with_junction("t", "id", "id");
    assert!(matches!(EntityRegistry::new([b]), Err(Error::InvalidBinding(_))));
  }

  #[test]
  fn identifier_check() {
    assert!(is_sql_identifier("tasks_comments_nm"));
    assert!(is_sql_identifier("_x1"));
    assert!(!is_sql_identifier("1abc"));
    assert!(!is_sql_identifier(""));
    assert!(!is_sql_identifier("a\"b"));
  }
}
