//! The request pipeline and its stock middleware.
//!
//! Middleware run in mount order over a shared cursor; each one either
//! returns an [`Outcome`] directly or drives the remainder of the
//! pipeline itself via [`Chain::next`] and post-processes the result.

mod core;
mod ignore;
mod logger;
mod metrics;
mod recover;

pub use core::{Chain, Middleware, Outcome};
pub use ignore::IgnorePaths;
pub use logger::RequestLog;
pub use metrics::Metrics;
pub use recover::Recover;
