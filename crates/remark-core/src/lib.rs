//! Core types and trait definitions for the Remark comment store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::CommentStore`]; the HTTP layer and the
//! server binary depend on that abstraction only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod comment;
pub mod error;
pub mod key;
pub mod page;
pub mod registry;
pub mod store;

pub use error::{Error, ErrorKind, HasErrorKind, Result};
