//! Outbound response streaming types.

use crate::{BoxFut, Link, RequestId, ResponseStatusCode};
use bytes::Bytes;
#[cfg(feature = "mockall")]
use mockall::automock;
use std::sync::Arc;

/// The per-peer outbound response channel.
///
/// One instance exists per remote peer; it buffers and batches outgoing
/// blocks into protocol messages. Implementations are responsible for their
/// own concurrency safety under multiple concurrent workers.
#[cfg_attr(feature = "mockall", automock)]
pub trait PeerResponseSender: 'static + Send + Sync + std::fmt::Debug {
    /// Begin operating this sender.
    fn startup(&self);

    /// Stop operating this sender.
    fn shutdown(&self);

    /// Enqueue one block for batched delivery on the given request's
    /// response stream. Best effort; the send resolves once the block has
    /// been accepted for batching, which may apply backpressure to the
    /// calling worker.
    fn send_response(
        &self,
        request: RequestId,
        link: Link,
        data: Bytes,
    ) -> BoxFut<'_, ()>;

    /// Signal normal completion of the given request's response stream.
    ///
    /// Must be called at most once per request, and never after
    /// [finish_with_error](Self::finish_with_error) for the same request.
    fn finish_request(&self, request: RequestId);

    /// Signal abnormal completion of the given request's response stream
    /// with a protocol-level status code. Mutually exclusive with
    /// [finish_request](Self::finish_request) for the same request.
    fn finish_with_error(&self, request: RequestId, status: ResponseStatusCode);
}

/// Trait-object [PeerResponseSender].
pub type DynPeerResponseSender = Arc<dyn PeerResponseSender>;
