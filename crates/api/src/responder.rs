//! Responder module types.

use crate::{builder, config, BoxFut, GraphRequest, PeerId, WeftResult};
use std::sync::Arc;

/// Trait for implementing the response-serving half of the protocol: accept
/// selector queries from remote peers, schedule them fairly, stream matched
/// blocks back and honor mid-flight cancellation.
///
/// Construction starts the module's control loop and worker pool; dropping
/// the instance stops them.
pub trait Responder: 'static + Send + Sync + std::fmt::Debug {
    /// Submit a batch of inbound request entries received from `peer`.
    ///
    /// New requests are queued for execution; cancellations take effect
    /// immediately for queued work and cooperatively for running work.
    /// Malformed entries become per-request error responses, never a
    /// responder failure.
    fn process_requests(
        &self,
        peer: PeerId,
        requests: Vec<GraphRequest>,
    ) -> BoxFut<'_, WeftResult<()>>;

    /// Block until every event submitted before this call has been applied
    /// by the control loop.
    ///
    /// The loop is asynchronous with respect to callers; without this
    /// barrier, coordinating logic (and tests) cannot observe a consistent
    /// snapshot of scheduling state.
    fn synchronize(&self) -> BoxFut<'_, WeftResult<()>>;
}

/// Trait-object [Responder].
pub type DynResponder = Arc<dyn Responder>;

/// A factory for creating Responder instances.
pub trait ResponderFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut config::Config) -> WeftResult<()>;

    /// Construct a Responder instance.
    fn create(
        &self,
        builder: Arc<builder::Builder>,
    ) -> BoxFut<'static, WeftResult<DynResponder>>;
}

/// Trait-object [ResponderFactory].
pub type DynResponderFactory = Arc<dyn ResponderFactory>;
