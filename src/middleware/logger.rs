use std::time::Instant;

use tracing::{info, info_span};

use super::{Chain, Middleware, Outcome};
use crate::context::Context;

/// Structured request/response logging.
///
/// Wraps the rest of the pipeline: opens a span for the request, runs
/// everything downstream, then emits one event with the final status and
/// elapsed time. Mount it first so the measurement covers the whole
/// pipeline.
pub struct RequestLog;

impl Middleware for RequestLog {
    fn handle(&self, ctx: &mut Context, chain: &Chain<'_>) -> Outcome {
        let span = info_span!(
            "request",
            method = %ctx.request.method,
            path = %ctx.request.path,
            remote_ip = %ctx.request.remote_ip,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let outcome = chain.next(&mut *ctx);

        info!(
            status = ctx.response.status,
            body_bytes = ctx.response.body.len(),
            latency_us = start.elapsed().as_micros() as u64,
            outcome = ?outcome,
            "request complete"
        );
        outcome
    }
}
