use std::io;
use std::net::ToSocketAddrs;
use std::sync::Arc;

use may_minihttp::HttpService;
use tracing::info;

use crate::context::Context;
use crate::middleware::{Chain, Middleware, Outcome};
use crate::pool::{Pool, Pooled};
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{parse_request, HttpServer, Request, ServerHandle};

/// Application builder: a middleware list plus runtime configuration.
///
/// Mount order is execution order, and the router is mounted like any
/// other middleware, normally last. Consumed into an [`AppService`] for
/// serving.
pub struct App {
    middlewares: Vec<Arc<dyn Middleware>>,
    config: RuntimeConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an empty app with configuration read from the environment.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            middlewares: Vec::new(),
            config,
        }
    }

    /// Append a middleware to the pipeline.
    #[must_use]
    pub fn mount<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.mount_shared(Arc::new(middleware))
    }

    /// Append an already-shared middleware, keeping the caller's `Arc`
    /// alive for out-of-band access (e.g. reading metrics counters).
    #[must_use]
    pub fn mount_shared(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Mount a router as the pipeline tail. Convenience for the common
    /// layout where routing is the last stage.
    #[must_use]
    pub fn route(self, router: Router) -> Self {
        self.mount(router)
    }

    /// Freeze the middleware list into a serveable [`AppService`].
    pub fn into_service(self) -> AppService {
        AppService {
            middlewares: self.middlewares.into(),
            pool: Arc::new(Pool::new(self.config.pool_capacity)),
        }
    }

    /// Configure the coroutine runtime and start serving on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        may::config().set_stack_size(self.config.stack_size);
        info!(
            stack_size = self.config.stack_size,
            pool_capacity = self.config.pool_capacity,
            middleware_count = self.middlewares.len(),
            "starting server"
        );
        HttpServer(self.into_service()).start(addr)
    }
}

/// The serving half of an [`App`]: an immutable middleware list and a
/// context pool, cloned cheaply into every worker coroutine.
#[derive(Clone)]
pub struct AppService {
    middlewares: Arc<[Arc<dyn Middleware>]>,
    pool: Arc<Pool<Context>>,
}

impl AppService {
    /// Run one request through the pipeline without touching the wire.
    ///
    /// Returns the pipeline outcome and the context, still holding the
    /// populated response. The response has not been finalized; call
    /// [`Response::finalize`](crate::Response::finalize) to apply the
    /// on-wire rules. Useful for tests and offline dispatch.
    pub fn run(&self, request: Request) -> (Outcome, Pooled<Context>) {
        let mut ctx = self.pool.acquire();
        ctx.begin(request);
        let outcome = Chain::new(&self.middlewares).next(&mut ctx);
        (outcome, ctx)
    }

    /// Number of idle contexts currently pooled.
    pub fn pooled_contexts(&self) -> usize {
        self.pool.idle()
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: may_minihttp::Request, res: &mut may_minihttp::Response) -> io::Result<()> {
        let request = parse_request(req);
        let (outcome, mut ctx) = self.run(request);

        // Abort means a middleware took over the wire entirely; anything
        // else gets the buffered response finalized and written.
        if outcome != Outcome::Abort {
            let ctx = &mut *ctx;
            ctx.response.end(&ctx.request.method, res);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request(method: Method, path: &str) -> Request {
        Request {
            method,
            path: path.to_string(),
            ..Request::default()
        }
    }

    #[test]
    fn test_run_routes_and_binds_params() {
        let router = Router::new();
        router
            .get("/users/:id", |ctx| {
                let id = ctx.params.get("id").unwrap_or("").to_string();
                ctx.response.plain(200, &id);
            })
            .unwrap();
        let service = App::new().route(router).into_service();

        let (outcome, ctx) = service.run(request(Method::GET, "/users/42"));
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(ctx.response.status, 200);
        assert_eq!(ctx.response.body, b"42");
    }

    #[test]
    fn test_run_unknown_route_is_404_break() {
        let service = App::new().route(Router::new()).into_service();
        let (outcome, ctx) = service.run(request(Method::GET, "/missing"));
        assert_eq!(outcome, Outcome::Break);
        assert_eq!(ctx.response.status, 404);
    }

    #[test]
    fn test_contexts_recycle_through_pool() {
        let service = App::new().route(Router::new()).into_service();
        assert_eq!(service.pooled_contexts(), 0);
        {
            let (_, _ctx) = service.run(request(Method::GET, "/a"));
        }
        assert_eq!(service.pooled_contexts(), 1);

        let (_, ctx) = service.run(request(Method::GET, "/b"));
        assert_eq!(service.pooled_contexts(), 0, "recycled context was reused");
        assert_eq!(ctx.request.path, "/b");
    }
}
