//! Selector evaluation types.
//!
//! The responder treats selector evaluation as a traversal primitive it
//! drives: the engine compiles an encoded selector into a cursor, and the
//! query executor pulls links from the cursor one at a time, feeding each
//! loaded block back so the cursor can discover further links.

use crate::{Link, WeftResult};
use std::sync::Arc;

/// One in-progress selector-guided walk of a graph.
///
/// The cursor owns all traversal state (current node, pending visit set);
/// it is opaque to the responder core.
pub trait Traversal: Send {
    /// The next link to visit, in selector-defined order, or `None` when
    /// the selection is exhausted.
    fn next_link(&mut self) -> Option<Link>;

    /// Feed the raw block for the most recently yielded link back to the
    /// cursor so it can discover further links to visit.
    fn advance(&mut self, link: &Link, data: &bytes::Bytes)
        -> WeftResult<()>;
}

/// Trait-object [Traversal].
pub type DynTraversal = Box<dyn Traversal>;

/// Compiles encoded selectors into traversal cursors.
pub trait SelectorEngine: 'static + Send + Sync + std::fmt::Debug {
    /// Compile `selector` into a traversal rooted at `root`.
    ///
    /// A selector that cannot be decoded is a per-request error, reported
    /// to the requesting peer, never a responder failure.
    fn compile(
        &self,
        root: Link,
        selector: bytes::Bytes,
    ) -> WeftResult<DynTraversal>;
}

/// Trait-object [SelectorEngine].
pub type DynSelectorEngine = Arc<dyn SelectorEngine>;
