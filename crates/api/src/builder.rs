//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general GraphWeft builder.
/// This contains configuration, the collaborator instances the responder
/// drives, and the responder factory, allowing construction of a runtime
/// responder instance.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building modules.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: config::Config,

    /// The [BlockLoader] used to materialize blocks during traversal.
    pub loader: DynBlockLoader,

    /// The [SelectorEngine] used to compile encoded selectors.
    pub selector_engine: DynSelectorEngine,

    /// The [PeerManager] resolving per-peer response senders.
    pub peer_manager: DynPeerManager,

    /// The [QueryQueue] multiplexing request work across peers.
    pub query_queue: DynQueryQueue,

    /// The [ResponderFactory] to be used for creating the [Responder]
    /// instance.
    pub responder: DynResponderFactory,
}

impl Builder {
    /// Populate the config with defaults from the configured module
    /// factories. Note, this should be called before freezing the Builder
    /// instance in an Arc<>.
    pub fn with_default_config(mut self) -> WeftResult<Self> {
        let responder = self.responder.clone();
        responder.default_config(&mut self.config)?;
        Ok(self)
    }

    /// Generate an actual responder instance from this builder.
    pub async fn build(self) -> WeftResult<DynResponder> {
        let builder = Arc::new(self);
        let responder = builder.responder.clone();
        responder.create(builder).await
    }
}
