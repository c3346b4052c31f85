use std::fmt;

use super::Handler;
use crate::server::Params;

/// Marker error for a registration whose full segment sequence already
/// terminates at a handler-bearing node. Translated into
/// [`RouterError::DuplicateRoute`](crate::RouterError::DuplicateRoute)
/// with the offending path at the tree layer.
pub(crate) struct DuplicatePath;

/// One node of the routing trie.
///
/// Each node carries a single path segment pattern: a literal (`users`)
/// or a parameter marker (`:id`). Children are kept in insertion order
/// and that order is semantically significant: lookup tries them
/// first-registered-first, with no literal-over-parameter precedence.
/// `height` caches the longest path from this node to any descendant
/// (itself included), so lookup can skip subtrees too shallow for the
/// remaining segments.
pub(crate) struct RouteNode {
    pattern: String,
    height: usize,
    handler: Option<Handler>,
    children: Vec<RouteNode>,
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("pattern", &self.pattern)
            .field("height", &self.height)
            .field("handler", &self.handler.is_some())
            .field("children", &self.children)
            .finish()
    }
}

impl RouteNode {
    pub(crate) fn new(pattern: &str) -> Self {
        debug_assert!(!pattern.is_empty(), "empty segment pattern");
        Self {
            pattern: pattern.to_string(),
            height: 0,
            handler: None,
            children: Vec::new(),
        }
    }

    fn is_param(&self) -> bool {
        self.pattern.starts_with(':')
    }

    fn param_name(&self) -> &str {
        &self.pattern[1..]
    }

    pub(crate) fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Merge a segment sequence (anchored at this node's own pattern)
    /// into the trie. Returns `Ok(true)` if the sequence was consumed
    /// here, `Ok(false)` if this node is not its anchor.
    ///
    /// A parameter segment is an ordinary literal for merge purposes:
    /// `:id` only reuses an existing `:id` child, and `:id` next to a
    /// literal sibling is a distinct node. It becomes wildcard-like
    /// during lookup only.
    pub(crate) fn merge(
        &mut self,
        segments: &[&str],
        handler: &Handler,
    ) -> Result<bool, DuplicatePath> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(false);
        };
        if self.pattern != *first {
            return Ok(false);
        }
        if rest.is_empty() {
            if self.handler.is_some() {
                return Err(DuplicatePath);
            }
            self.handler = Some(handler.clone());
            return Ok(true);
        }

        // existing children get first claim on the remainder
        for child in &mut self.children {
            if child.merge(rest, handler)? {
                return Ok(true);
            }
        }

        if let Some(chain) = Self::new_chain(rest, handler) {
            self.children.push(chain);
        }
        Ok(true)
    }

    /// Build a straight-line chain of nodes for the remaining segments;
    /// only the tail owns the handler.
    fn new_chain(segments: &[&str], handler: &Handler) -> Option<RouteNode> {
        let (last, init) = segments.split_last()?;
        let mut node = RouteNode::new(last);
        node.handler = Some(handler.clone());
        for seg in init.iter().rev() {
            let mut parent = RouteNode::new(seg);
            parent.children.push(node);
            node = parent;
        }
        Some(node)
    }

    /// Recompute cached heights bottom-up after a structural change.
    pub(crate) fn recalc_height(&mut self) -> usize {
        let max = self
            .children
            .iter_mut()
            .map(RouteNode::recalc_height)
            .max()
            .unwrap_or(0);
        self.height = max + 1;
        self.height
    }

    /// Walk the trie looking for a terminal, handler-bearing node that
    /// consumes all `segments`. Children are tried in registration order
    /// and the first complete match wins. Parameter bindings are recorded
    /// on the success path only; failed subtree descents leave `params`
    /// untouched.
    pub(crate) fn find<'n>(&'n self, segments: &[&str], params: &mut Params) -> Option<&'n RouteNode> {
        let remaining = segments.len();
        if remaining == 0 || self.height < remaining {
            return None;
        }
        let (first, rest) = segments.split_first()?;
        let is_param = self.is_param();
        if !is_param && self.pattern != *first {
            return None;
        }

        if rest.is_empty() {
            if self.handler.is_some() {
                if is_param {
                    params.insert(self.param_name(), *first);
                }
                return Some(self);
            }
            return None;
        }

        for child in &self.children {
            if let Some(found) = child.find(rest, params) {
                if is_param {
                    params.insert(self.param_name(), *first);
                }
                return Some(found);
            }
        }
        None
    }
}
