use http::Method;
use thiserror::Error;

/// Errors surfaced by route registration.
///
/// These are startup-time failures and are expected to be fatal to the
/// caller: a duplicate route or an unroutable method is a configuration
/// bug, not a runtime condition. Dispatch-time misses (404/501) are never
/// reported through this type; they travel as response status codes.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A second handler was registered for a path whose full segment
    /// sequence already terminates at a handler-bearing node.
    #[error("duplicate route registration for {path:?}")]
    DuplicateRoute {
        /// The path pattern as passed to the registration call
        path: String,
    },

    /// The HTTP method has no routing tree (only GET/POST/PUT/PATCH/
    /// DELETE/OPTIONS/HEAD are routable).
    #[error("no routing tree for method {0}")]
    UnsupportedMethod(Method),
}
