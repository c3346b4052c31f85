use http::Extensions;

use crate::pool::Recycle;
use crate::server::{Params, Request, Response};

/// Per-request mutable state, drawn from the application's context pool.
///
/// Holds the pipeline cursor, the request/response wrappers, path
/// parameters bound by the router, and a typed slot map that middleware
/// use to pass state downstream (session handles, locale, flash data).
/// A context is exclusively owned by one request while in flight and is
/// recycled afterwards; every per-request field is cleared on recycle.
pub struct Context {
    /// Index of the next middleware to run: 0 before the pipeline starts,
    /// the list length once it is exhausted or short-circuited.
    pub(crate) cursor: usize,
    /// The parsed inbound request
    pub request: Request,
    /// The buffered outbound response
    pub response: Response,
    /// Path parameters bound by the router on a successful match
    pub params: Params,
    slots: Extensions,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            cursor: 0,
            request: Request::default(),
            response: Response::default(),
            params: Params::default(),
            slots: Extensions::new(),
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the context with the parsed request for a new dispatch cycle.
    pub(crate) fn begin(&mut self, request: Request) {
        self.request = request;
    }

    /// Store a typed value for downstream middleware or the handler.
    /// One value per type; a second insert of the same type replaces the
    /// first.
    pub fn set_slot<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.slots.insert(value);
    }

    /// Get a typed value stored by an upstream middleware.
    pub fn slot<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.slots.get()
    }

    /// Mutable access to a typed slot value.
    pub fn slot_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.slots.get_mut()
    }
}

impl Recycle for Context {
    fn recycle(&mut self) {
        self.cursor = 0;
        self.request.reset();
        self.response.reset();
        self.params.clear();
        self.slots.clear();
    }
}
