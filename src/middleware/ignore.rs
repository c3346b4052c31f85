use std::collections::HashSet;

use super::{Chain, Middleware, Outcome};
use crate::context::Context;

/// Short-circuit for noise paths.
///
/// Answers an exact-match set of paths (favicons, probe URLs, crawler
/// fodder) with a trivial 200 before they reach the router. Matching is
/// on the raw request path, query string excluded.
pub struct IgnorePaths {
    paths: HashSet<String>,
}

impl IgnorePaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Middleware for IgnorePaths {
    fn handle(&self, ctx: &mut Context, _chain: &Chain<'_>) -> Outcome {
        if self.paths.contains(&ctx.request.path) {
            ctx.response.plain(200, "ignored");
            return Outcome::Break;
        }
        Outcome::Continue
    }
}
