use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::{Chain, Middleware, Outcome};
use crate::context::Context;

/// Passive request statistics.
///
/// Counts requests, accumulates latency and buckets final statuses by
/// class. All counters are atomics; the middleware never blocks or
/// short-circuits a request. Wraps the downstream pipeline so the
/// latency measurement includes handler time.
///
/// Keep an `Arc` to the instance mounted into the app to read the
/// counters from a reporting endpoint or a shutdown hook.
pub struct Metrics {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    status_2xx: AtomicUsize,
    status_3xx: AtomicUsize,
    status_4xx: AtomicUsize,
    status_5xx: AtomicUsize,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            total_latency_ns: AtomicU64::new(0),
            status_2xx: AtomicUsize::new(0),
            status_3xx: AtomicUsize::new(0),
            status_4xx: AtomicUsize::new(0),
            status_5xx: AtomicUsize::new(0),
        }
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests observed.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean latency across all observed requests; zero before the first.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Counts of final statuses by class: `(2xx, 3xx, 4xx, 5xx)`.
    pub fn status_classes(&self) -> (usize, usize, usize, usize) {
        (
            self.status_2xx.load(Ordering::Relaxed),
            self.status_3xx.load(Ordering::Relaxed),
            self.status_4xx.load(Ordering::Relaxed),
            self.status_5xx.load(Ordering::Relaxed),
        )
    }

    fn record_status(&self, status: u16) {
        let bucket = match status {
            200..=299 => &self.status_2xx,
            300..=399 => &self.status_3xx,
            400..=499 => &self.status_4xx,
            500..=599 => &self.status_5xx,
            _ => return,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }
}

impl Middleware for Metrics {
    fn handle(&self, ctx: &mut Context, chain: &Chain<'_>) -> Outcome {
        let start = Instant::now();
        let outcome = chain.next(&mut *ctx);
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        // a status of 0 here means downstream never set one; the default
        // applied at finalization is not visible to this middleware
        self.record_status(ctx.response.status);
        outcome
    }
}
