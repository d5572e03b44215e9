//! Paging and ordering for comment listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Order in which comments are listed for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentOrder {
  /// Creation time ascending.
  #[default]
  OldestFirst,
  NewestFirst,
}

/// A window into a listing. `limit == 0` asks for the total count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub offset: usize,
  pub limit:  usize,
}

impl PageRequest {
  pub fn new(offset: usize, limit: usize) -> Self { Self { offset, limit } }

  pub fn first(limit: usize) -> Self { Self { offset: 0, limit } }
}

impl Default for PageRequest {
  fn default() -> Self { Self::first(DEFAULT_PAGE_SIZE) }
}

/// One page of results plus the total number of matches.
///
/// Pages are finite and restartable: re-issuing the same request yields the
/// same window as long as no comments were added in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:  Vec<T>,
  pub total:  usize,
  pub offset: usize,
  pub limit:  usize,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
    Self { items, total, offset: request.offset, limit: request.limit }
  }

  pub fn has_more(&self) -> bool { self.offset + self.items.len() < self.total }

  /// The request for the following page, if there is one.
  pub fn next_request(&self) -> Option<PageRequest> {
    (self.limit > 0 && self.has_more())
      .then(|| PageRequest::new(self.offset + self.items.len(), self.limit))
  }
}
