//! Identifiers that come from outside the comment store: the owning entity's
//! primary key and the author's user reference.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ─── EntityKey ───────────────────────────────────────────────────────────────

/// The primary key of an owning entity.
///
/// Only single-column keys are supported; composite keys are not. Integer keys
/// are held in their decimal text form, so `42` and `"42"` address the same
/// entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
  pub fn new(key: impl Into<String>) -> Self { Self(key.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// A key consisting only of whitespace is treated as absent.
  pub fn is_empty(&self) -> bool { self.0.trim().is_empty() }
}

impl fmt::Display for EntityKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for EntityKey {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for EntityKey {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

macro_rules! entity_key_from_int {
  ($($t:ty),*) => {
    $(
      impl From<$t> for EntityKey {
        fn from(n: $t) -> Self { Self(n.to_string()) }
      }
    )*
  };
}

entity_key_from_int!(i32, i64, u32, u64);

impl<'de> Deserialize<'de> for EntityKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Signed(i64),
      Unsigned(u64),
      Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
      Raw::Signed(n) => n.into(),
      Raw::Unsigned(n) => n.into(),
      Raw::Text(s) => s.into(),
    })
  }
}

// ─── AuthorId ────────────────────────────────────────────────────────────────

/// Reference to a user held by the external identity provider.
///
/// The store keeps the reference only; it never checks that the user exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AuthorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for AuthorId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for AuthorId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}
