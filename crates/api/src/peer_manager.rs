//! Peer sender resolution.

use crate::{DynPeerResponseSender, PeerId};
use std::sync::Arc;

/// Resolves the outbound response sender for a peer, creating one if the
/// peer has not been seen before.
pub trait PeerManager: 'static + Send + Sync + std::fmt::Debug {
    /// Get the [PeerResponseSender](crate::PeerResponseSender) for `peer`.
    fn sender_for_peer(&self, peer: PeerId) -> DynPeerResponseSender;
}

/// Trait-object [PeerManager].
pub type DynPeerManager = Arc<dyn PeerManager>;
