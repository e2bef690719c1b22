//! Fragment resolution.
//!
//! Embeds are inlined with every fragment-defined id prefixed by the embed namespace, so the
//! resolved tree satisfies the same invariants as hand-authored input.

/// Single-embed expansion with namespace mangling.
pub mod embed;
/// Whole-frame resolution and the fragment preview adapter.
pub mod frame;

use crate::schema::validate::{DEFAULT_MAX_DEPTH, NAMESPACE_SEPARATOR};

/// Resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOpts {
    /// Deepest node nesting followed before resolution gives up with
    /// [`SceneLinkError::DepthExceeded`](crate::SceneLinkError::DepthExceeded).
    pub max_depth: usize,
}

impl Default for ResolveOpts {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// `"{namespace}_{id}"`.
pub fn mangle(namespace: &str, id: &str) -> String {
    let mut s = String::with_capacity(namespace.len() + id.len() + 1);
    s.push_str(namespace);
    s.push(NAMESPACE_SEPARATOR);
    s.push_str(id);
    s
}
