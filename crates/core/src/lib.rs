#![deny(missing_docs)]
//! GraphWeft p2p graph-synchronization responder.
//!
//! This crate provides the production [Responder](graphweft_api::Responder)
//! module along with in-memory implementations of the collaborator seams it
//! drives (block store, query queue, selector engine).

use graphweft_api::{builder::Builder, config::Config, *};

/// Construct a builder wired with the production responder factory and the
/// in-memory collaborator implementations.
///
/// - `loader` - The default loader is [factories::MemBlockStore].
/// - `selector_engine` - The default engine is
///   [factories::EnumeratedSelectorEngine].
/// - `query_queue` - The default queue is [factories::MemQueryQueue].
///
/// The peer manager fronts the transport layer, so the host supplies it.
pub fn default_builder(peer_manager: DynPeerManager) -> Builder {
    Builder {
        config: Config::default(),
        loader: factories::MemBlockStore::create(),
        selector_engine: factories::EnumeratedSelectorEngine::create(),
        peer_manager,
        query_queue: factories::MemQueryQueue::create(),
        responder: factories::CoreResponderFactory::create(),
    }
}

pub mod factories;
