use std::sync::RwLock;

use super::node::RouteNode;
use super::Handler;
use crate::error::RouterError;
use crate::server::Params;

/// Root pattern shared by every tree; registration and lookup prepend it
/// so merging and matching always start from a common anchor.
const ROOT_PATTERN: &str = "/";

/// One routing trie, covering a single HTTP method.
///
/// Read-overwhelmingly after startup, so the node graph sits behind a
/// reader/writer lock: registrations take the write lock, lookups share
/// the read lock.
pub struct RouteTree {
    root: RwLock<RouteNode>,
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTree {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(RouteNode::new(ROOT_PATTERN)),
        }
    }

    /// Split a path into its non-empty segments. `"/"` and `""` yield an
    /// empty sequence, which anchors at the root node itself.
    fn split_path(path: &str) -> Vec<&str> {
        path.trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn anchored(path: &str) -> Vec<&str> {
        let segments = Self::split_path(path);
        let mut full = Vec::with_capacity(segments.len() + 1);
        full.push(ROOT_PATTERN);
        full.extend(segments);
        full
    }

    /// Register a handler for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] if the full segment
    /// sequence already terminates at a handler-bearing node. This is a
    /// startup-time failure; the first registration stays reachable.
    pub fn add(&self, path: &str, handler: Handler) -> Result<(), RouterError> {
        let full = Self::anchored(path);
        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        match root.merge(&full, &handler) {
            Ok(_) => {
                root.recalc_height();
                Ok(())
            }
            Err(_) => Err(RouterError::DuplicateRoute {
                path: path.to_string(),
            }),
        }
    }

    /// Match `path` against the trie.
    ///
    /// Returns the accumulated parameter bindings and the handler of the
    /// first registered route that consumes the whole segment sequence,
    /// or `None`. Never panics.
    pub fn lookup(&self, path: &str) -> Option<(Params, Handler)> {
        let full = Self::anchored(path);
        let mut params = Params::default();
        let root = self.root.read().unwrap_or_else(|e| e.into_inner());
        let node = root.find(&full, &mut params)?;
        let handler = node.handler()?.clone();
        Some((params, handler))
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.root
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tagged(tag: &'static str, hits: &Arc<AtomicUsize>) -> (Handler, &'static str) {
        let hits = Arc::clone(hits);
        let handler: Handler = Arc::new(move |ctx| {
            hits.fetch_add(1, Ordering::SeqCst);
            ctx.response.plain(200, tag);
        });
        (handler, tag)
    }

    fn handler_tag(handler: &Handler) -> String {
        let mut ctx = crate::Context::new();
        handler(&mut ctx);
        String::from_utf8(std::mem::take(&mut ctx.response.body)).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        for path in ["/", "/users", "/users/:id", "/users/:id/posts", "/about/team"] {
            let (h, _) = tagged(Box::leak(path.to_string().into_boxed_str()), &hits);
            tree.add(path, h).unwrap();
        }
        for (req, registered) in [
            ("/", "/"),
            ("/users", "/users"),
            ("/users/7", "/users/:id"),
            ("/users/7/posts", "/users/:id/posts"),
            ("/about/team", "/about/team"),
        ] {
            let (_, h) = tree.lookup(req).unwrap_or_else(|| panic!("no match for {req}"));
            assert_eq!(handler_tag(&h), registered);
        }
    }

    #[test]
    fn test_duplicate_rejected_first_wins() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (first, _) = tagged("first", &hits);
        let (second, _) = tagged("second", &hits);
        tree.add("/users/:id", first).unwrap();
        let err = tree.add("/users/:id", second).unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));

        let (_, h) = tree.lookup("/users/9").unwrap();
        assert_eq!(handler_tag(&h), "first");
    }

    #[test]
    fn test_parameter_binding() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (h, _) = tagged("post", &hits);
        tree.add("/users/:id/posts/:postId", h).unwrap();

        let (params, _) = tree.lookup("/users/42/posts/7").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("postId"), Some("7"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_height_pruning() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (a, _) = tagged("a", &hits);
        let (b, _) = tagged("b", &hits);
        let (c, _) = tagged("c", &hits);
        tree.add("/a", a).unwrap();
        tree.add("/a/b", b).unwrap();
        tree.add("/a/b/c", c).unwrap();
        // anchor + deepest chain
        assert_eq!(tree.height(), 4);

        // one segment deeper than any route: no match, no binding
        assert!(tree.lookup("/a/b/c/d").is_none());
    }

    #[test]
    fn test_first_match_wins_over_literal() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (param, _) = tagged("param", &hits);
        let (literal, _) = tagged("literal", &hits);
        tree.add("/a/:x", param).unwrap();
        tree.add("/a/b", literal).unwrap();

        // registration order decides: the earlier :x wins and binds x="b"
        let (params, h) = tree.lookup("/a/b").unwrap();
        assert_eq!(handler_tag(&h), "param");
        assert_eq!(params.get("x"), Some("b"));
    }

    #[test]
    fn test_literal_wins_when_registered_first() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (literal, _) = tagged("literal", &hits);
        let (param, _) = tagged("param", &hits);
        tree.add("/a/b", literal).unwrap();
        tree.add("/a/:x", param).unwrap();

        let (params, h) = tree.lookup("/a/b").unwrap();
        assert_eq!(handler_tag(&h), "literal");
        assert!(params.is_empty());

        let (params, h) = tree.lookup("/a/z").unwrap();
        assert_eq!(handler_tag(&h), "param");
        assert_eq!(params.get("x"), Some("z"));
    }

    #[test]
    fn test_handlerless_intermediate_is_no_match() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (h, _) = tagged("deep", &hits);
        tree.add("/a/b/c", h).unwrap();
        assert!(tree.lookup("/a").is_none());
        assert!(tree.lookup("/a/b").is_none());
    }

    #[test]
    fn test_shorter_route_alongside_children() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (short, _) = tagged("short", &hits);
        let (long, _) = tagged("long", &hits);
        tree.add("/users", short).unwrap();
        tree.add("/users/:id", long).unwrap();

        let (_, h) = tree.lookup("/users").unwrap();
        assert_eq!(handler_tag(&h), "short");
        let (_, h) = tree.lookup("/users/3").unwrap();
        assert_eq!(handler_tag(&h), "long");
    }

    #[test]
    fn test_param_terminal_with_children_still_matches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (mid, _) = tagged("mid", &hits);
        let (leaf, _) = tagged("leaf", &hits);
        tree.add("/a/:x", mid).unwrap();
        tree.add("/a/:x/b", leaf).unwrap();

        let (params, h) = tree.lookup("/a/42").unwrap();
        assert_eq!(handler_tag(&h), "mid");
        assert_eq!(params.get("x"), Some("42"));
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        let hits = Arc::new(AtomicUsize::new(0));
        let tree = RouteTree::new();
        let (h, _) = tagged("users", &hits);
        tree.add("/users/", h).unwrap();
        assert!(tree.lookup("/users").is_some());
        assert!(tree.lookup("users").is_some());
    }
}
