//! # Treeline
//!
//! **Treeline** is a coroutine-powered HTTP request-dispatch engine for
//! Rust: a method-aware routing trie joined to a cooperative middleware
//! pipeline, served on the `may` runtime.
//!
//! ## Overview
//!
//! Requests flow through an ordered middleware list sharing a single
//! cursor; each middleware returns an [`Outcome`] or re-enters the chain
//! to wrap everything downstream. The [`Router`] is itself a middleware,
//! mounted at the tail, resolving the path against one insertion-ordered
//! trie per HTTP method and invoking the matched handler with its bound
//! `:name` parameters. Per-request state lives on a pooled [`Context`]
//! that is recycled between requests.
//!
//! ## Architecture
//!
//! - **[`router`]** - Method-aware trie routing with `:name` parameters,
//!   first-registered-wins matching and cached-height pruning
//! - **[`middleware`]** - The pipeline core ([`Chain`], [`Outcome`]) and
//!   stock middleware (logging, panic recovery, metrics, ignore lists)
//! - **[`server`]** - HTTP plumbing over `may_minihttp`: request parsing,
//!   buffered responses with finalization rules, the listener wrapper
//! - **[`pool`]** - The recycled free-list behind the context pool
//! - **[`runtime_config`]** - Environment-driven runtime tuning
//!
//! ## Example
//!
//! ```no_run
//! use treeline::{App, RequestLog, Recover, Router};
//!
//! let router = Router::new();
//! router
//!     .get("/users/:id", |ctx| {
//!         let id = ctx.params.get("id").unwrap_or("").to_string();
//!         ctx.response.plain(200, &id);
//!     })
//!     .unwrap();
//!
//! let handle = App::new()
//!     .mount(RequestLog)
//!     .mount(Recover)
//!     .route(router)
//!     .start("0.0.0.0:8080")
//!     .unwrap();
//! handle.join().unwrap();
//! ```

pub mod app;
pub mod context;
pub mod error;
pub mod middleware;
pub mod pool;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use app::{App, AppService};
pub use context::Context;
pub use error::RouterError;
pub use middleware::{Chain, IgnorePaths, Metrics, Middleware, Outcome, Recover, RequestLog};
pub use router::{Handler, RouteTree, Router};
pub use runtime_config::RuntimeConfig;
pub use server::{Params, Request, Response};
