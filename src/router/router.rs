use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::tree::RouteTree;
use super::Handler;
use crate::context::Context;
use crate::error::RouterError;
use crate::middleware::{Chain, Middleware, Outcome};
use crate::server::Params;

/// The HTTP methods that get a routing tree. Anything else is answered
/// with 501 at dispatch time.
const ROUTABLE_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
    Method::HEAD,
];

/// Method-aware path router.
///
/// Holds one [`RouteTree`] per routable method and is itself a
/// [`Middleware`]: mounted into the pipeline, it resolves the request to
/// a handler, binds path parameters onto the context and invokes the
/// handler. Match failures become response status codes, never errors:
/// 501 when the method has no tree, 404 when no route terminates at a
/// handler for the path. Both short-circuit the pipeline with
/// [`Outcome::Break`].
///
/// Registration goes through the shared reference (`&self`); each tree
/// guards its node graph with its own lock, so routes may be added from
/// setup code holding only an `Arc<Router>`.
pub struct Router {
    trees: HashMap<Method, RouteTree>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with an empty tree per routable method.
    pub fn new() -> Self {
        let trees = ROUTABLE_METHODS
            .iter()
            .map(|m| (m.clone(), RouteTree::new()))
            .collect();
        Self { trees }
    }

    /// Register `handler` for `method` + `path`.
    ///
    /// Segments beginning with `:` bind the matched URL segment into the
    /// per-request parameter map under the name after the marker.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnsupportedMethod`] for methods outside the fixed
    /// seven, [`RouterError::DuplicateRoute`] when the path is already
    /// registered for the method. Both are fail-fast startup conditions.
    pub fn add<F>(&self, method: Method, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let tree = self
            .trees
            .get(&method)
            .ok_or_else(|| RouterError::UnsupportedMethod(method.clone()))?;
        tree.add(path, Arc::new(handler))?;
        debug!(method = %method, path, "route registered");
        Ok(())
    }

    pub fn get<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    pub fn put<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    pub fn patch<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::PATCH, path, handler)
    }

    pub fn delete<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::DELETE, path, handler)
    }

    pub fn options<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::OPTIONS, path, handler)
    }

    pub fn head<F>(&self, path: &str, handler: F) -> Result<(), RouterError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add(Method::HEAD, path, handler)
    }

    /// Resolve a method + path to parameter bindings and a handler.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(Params, Handler)> {
        self.trees.get(method)?.lookup(path)
    }
}

impl Middleware for Router {
    fn handle(&self, ctx: &mut Context, _chain: &Chain<'_>) -> Outcome {
        let Some(tree) = self.trees.get(&ctx.request.method) else {
            warn!(method = %ctx.request.method, "method not routable");
            ctx.response.status = 501;
            ctx.response.error = Some("method not supported".to_string());
            return Outcome::Break;
        };

        let Some((params, handler)) = tree.lookup(&ctx.request.path) else {
            debug!(method = %ctx.request.method, path = %ctx.request.path, "no route matched");
            ctx.response.status = 404;
            ctx.response.error = Some("route not found".to_string());
            return Outcome::Break;
        };

        ctx.params = params;
        handler(ctx);
        Outcome::Continue
    }
}
