//! Block loading types.

use crate::{BoxFut, Link, WeftResult};
use bytes::Bytes;
#[cfg(feature = "mockall")]
use mockall::automock;
use std::sync::Arc;

/// The API the host must implement to materialize content-addressed blocks
/// for the responder.
///
/// The loader is consulted once per visited node during a traversal. It may
/// block on I/O; only the calling worker is suspended, never the responder's
/// control loop.
#[cfg_attr(feature = "mockall", automock)]
pub trait BlockLoader: 'static + Send + Sync + std::fmt::Debug {
    /// Load the raw bytes of the block identified by `link`.
    ///
    /// Returns `None` if the block is not present in the local store. Other
    /// failures (I/O, corruption) are reported as errors.
    fn load(&self, link: Link) -> BoxFut<'_, WeftResult<Option<Bytes>>>;
}

/// Trait-object [BlockLoader].
pub type DynBlockLoader = Arc<dyn BlockLoader>;
