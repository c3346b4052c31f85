use std::sync::Arc;

use crate::context::Context;

/// Signal returned by a middleware to steer the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Proceed to the next middleware in the list.
    Continue,
    /// Stop executing further middleware; the response as currently
    /// populated on the context is still finalized and sent.
    Break,
    /// Stop executing further middleware and skip response finalization
    /// entirely; the middleware has taken over writing the response.
    Abort,
}

/// A cross-cutting component in the request pipeline.
///
/// Implementations read and write [`Context`] slots and the response, and
/// either return an [`Outcome`] directly or call [`Chain::next`] to run
/// the remainder of the pipeline and post-process afterwards (the onion
/// pattern). Both styles mix freely within one list.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut Context, chain: &Chain<'_>) -> Outcome;
}

/// Explicit continuation over the application's middleware list.
///
/// The cursor lives on the [`Context`] and is shared by every `next`
/// invocation for the request, so a re-entrant call from inside a
/// middleware resumes exactly where the driving loop stopped. Invariants:
/// the cursor advances exactly once per middleware invocation, and is
/// forced to the end-of-list sentinel the moment a non-`Continue` outcome
/// is produced, so calls unwinding up the stack terminate immediately.
pub struct Chain<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
}

impl<'a> Chain<'a> {
    pub(crate) fn new(middlewares: &'a [Arc<dyn Middleware>]) -> Self {
        Self { middlewares }
    }

    /// Run middleware from the context's cursor position until the list is
    /// exhausted or one of them stops the pipeline.
    ///
    /// Returns the last non-`Continue` outcome to the caller of this
    /// specific invocation, or `Continue` if the list ran to completion.
    /// An empty remainder yields `Break`.
    pub fn next(&self, ctx: &mut Context) -> Outcome {
        let len = self.middlewares.len();
        let mut outcome = Outcome::Break;
        loop {
            let i = ctx.cursor;
            if i >= len {
                break;
            }
            ctx.cursor = i + 1;
            outcome = self.middlewares[i].handle(ctx, self);
            if outcome != Outcome::Continue {
                ctx.cursor = len;
                break;
            }
        }
        outcome
    }

    /// Number of middleware in the full list (not the remainder).
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}
