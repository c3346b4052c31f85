//! Method-aware path routing.
//!
//! A [`Router`] keeps one insertion-ordered trie per HTTP method.
//! Patterns are plain segments or `:name` parameter markers; lookup is
//! first-registered-wins with no precedence between literals and
//! parameters, and duplicate registrations are rejected at startup.

mod node;
mod router;
mod tree;

use std::sync::Arc;

use crate::context::Context;

/// A route endpoint. Handlers mutate the context's response in place;
/// they are shared across worker coroutines, so they must be `Send +
/// Sync` and take no `&mut self`.
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync>;

pub use router::Router;
pub use tree::RouteTree;
