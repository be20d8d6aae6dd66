//! A fake peer manager handing out fake senders.

use graphweft_api::{DynPeerResponseSender, PeerId, PeerManager};
use std::collections::HashMap;
use std::sync::Mutex;

/// A [PeerManager] that returns a fixed default sender, with optional
/// per-peer overrides, and records the last peer resolved.
#[derive(Debug)]
pub struct FakePeerManager {
    default_sender: DynPeerResponseSender,
    senders: Mutex<HashMap<PeerId, DynPeerResponseSender>>,
    last_peer: Mutex<Option<PeerId>>,
}

impl FakePeerManager {
    /// Construct with a default sender returned for every peer.
    pub fn new(default_sender: DynPeerResponseSender) -> Self {
        Self {
            default_sender,
            senders: Mutex::new(HashMap::new()),
            last_peer: Mutex::new(None),
        }
    }

    /// Route a specific peer to its own sender.
    pub fn set_sender(&self, peer: PeerId, sender: DynPeerResponseSender) {
        self.senders.lock().unwrap().insert(peer, sender);
    }

    /// The peer most recently resolved, if any.
    pub fn last_peer(&self) -> Option<PeerId> {
        self.last_peer.lock().unwrap().clone()
    }
}

impl PeerManager for FakePeerManager {
    fn sender_for_peer(&self, peer: PeerId) -> DynPeerResponseSender {
        *self.last_peer.lock().unwrap() = Some(peer.clone());
        self.senders
            .lock()
            .unwrap()
            .get(&peer)
            .cloned()
            .unwrap_or_else(|| self.default_sender.clone())
    }
}
