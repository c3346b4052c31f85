use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use super::{Chain, Middleware, Outcome};
use crate::context::Context;

/// Panic barrier for the rest of the pipeline.
///
/// Catches an unwind from any downstream middleware or handler, records
/// it on the response as an internal error and breaks the pipeline so
/// the 500 is still finalized and sent. Without it a handler panic
/// unwinds into the serving coroutine and the connection is dropped with
/// no response.
pub struct Recover;

impl Middleware for Recover {
    fn handle(&self, ctx: &mut Context, chain: &Chain<'_>) -> Outcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| chain.next(&mut *ctx)));
        match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                error!(
                    method = %ctx.request.method,
                    path = %ctx.request.path,
                    panic = %msg,
                    "handler panicked"
                );
                ctx.response.status = 500;
                ctx.response.error = Some("internal server error".to_string());
                Outcome::Break
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Panics;

    impl Middleware for Panics {
        fn handle(&self, _ctx: &mut Context, _chain: &Chain<'_>) -> Outcome {
            panic!("boom");
        }
    }

    struct Ok200;

    impl Middleware for Ok200 {
        fn handle(&self, ctx: &mut Context, _chain: &Chain<'_>) -> Outcome {
            ctx.response.plain(200, "ok");
            Outcome::Break
        }
    }

    #[test]
    fn test_panic_becomes_500_break() {
        let list: Vec<Arc<dyn Middleware>> = vec![Arc::new(Recover), Arc::new(Panics)];
        let mut ctx = Context::new();
        let outcome = Chain::new(&list).next(&mut ctx);
        assert_eq!(outcome, Outcome::Break);
        assert_eq!(ctx.response.status, 500);
        assert!(ctx.response.error.is_some());
        assert_eq!(ctx.cursor, list.len());
    }

    #[test]
    fn test_no_panic_passes_through() {
        let list: Vec<Arc<dyn Middleware>> = vec![Arc::new(Recover), Arc::new(Ok200)];
        let mut ctx = Context::new();
        let outcome = Chain::new(&list).next(&mut ctx);
        assert_eq!(outcome, Outcome::Break);
        assert_eq!(ctx.response.status, 200);
        assert!(ctx.response.error.is_none());
    }
}
