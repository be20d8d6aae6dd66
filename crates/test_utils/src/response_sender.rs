//! A fake peer response sender recording everything it is handed.

use bytes::Bytes;
use graphweft_api::{
    BoxFut, DynPeerResponseSender, Link, PeerResponseSender, RequestId,
    ResponseStatusCode,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// One recorded send_response call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentResponse {
    /// The request the block belongs to.
    pub request: RequestId,
    /// The block's link.
    pub link: Link,
    /// The block's raw bytes.
    pub data: Bytes,
}

/// One recorded completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The completed request.
    pub request: RequestId,
    /// The error status, or `None` for a normal finish.
    pub status: Option<ResponseStatusCode>,
}

/// Either half of the fake sender's recorded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeSenderEvent {
    /// A recorded send_response call.
    Response(SentResponse),
    /// A recorded completion call.
    Completion(Completion),
}

/// A [PeerResponseSender] that records calls for assertions.
///
/// In gated mode each send_response blocks until the receiving side grants
/// it, reproducing a sender whose outbound batching applies backpressure.
/// Completion calls are never gated.
#[derive(Debug)]
pub struct FakePeerResponseSender {
    responses_tx: mpsc::UnboundedSender<SentResponse>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    gate: Option<Arc<Semaphore>>,
}

/// The receiving half of a [FakePeerResponseSender].
#[derive(Debug)]
pub struct FakeSenderReceiver {
    responses_rx: mpsc::UnboundedReceiver<SentResponse>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    gate: Option<Arc<Semaphore>>,
}

impl FakePeerResponseSender {
    /// Construct an ungated fake sender: send_response never blocks.
    pub fn new() -> (DynPeerResponseSender, FakeSenderReceiver) {
        Self::build(None)
    }

    /// Construct a gated fake sender: each send_response blocks until the
    /// receiver side grants it.
    pub fn gated() -> (DynPeerResponseSender, FakeSenderReceiver) {
        Self::build(Some(Arc::new(Semaphore::new(0))))
    }

    fn build(
        gate: Option<Arc<Semaphore>>,
    ) -> (DynPeerResponseSender, FakeSenderReceiver) {
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                responses_tx,
                completions_tx,
                gate: gate.clone(),
            }),
            FakeSenderReceiver {
                responses_rx,
                completions_rx,
                gate,
            },
        )
    }
}

impl PeerResponseSender for FakePeerResponseSender {
    fn startup(&self) {}

    fn shutdown(&self) {}

    fn send_response(
        &self,
        request: RequestId,
        link: Link,
        data: Bytes,
    ) -> BoxFut<'_, ()> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                // permits are granted one per expected response and never
                // returned
                gate.acquire().await.expect("sender gate closed").forget();
            }
            let _ = self.responses_tx.send(SentResponse {
                request,
                link,
                data,
            });
        })
    }

    fn finish_request(&self, request: RequestId) {
        let _ = self.completions_tx.send(Completion {
            request,
            status: None,
        });
    }

    fn finish_with_error(
        &self,
        request: RequestId,
        status: ResponseStatusCode,
    ) {
        let _ = self.completions_tx.send(Completion {
            request,
            status: Some(status),
        });
    }
}

impl FakeSenderReceiver {
    /// Grant one gated send (no-op when ungated) and await the next
    /// recorded response.
    pub async fn next_response(&mut self) -> SentResponse {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
        self.responses_rx.recv().await.expect("fake sender dropped")
    }

    /// Await the next recorded completion call.
    pub async fn next_completion(&mut self) -> Completion {
        self.completions_rx
            .recv()
            .await
            .expect("fake sender dropped")
    }

    /// Grant one gated send and await whichever of a response or a
    /// completion is recorded next.
    pub async fn next_event(&mut self) -> FakeSenderEvent {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
        tokio::select! {
            response = self.responses_rx.recv() => FakeSenderEvent::Response(
                response.expect("fake sender dropped"),
            ),
            completion = self.completions_rx.recv() => {
                FakeSenderEvent::Completion(
                    completion.expect("fake sender dropped"),
                )
            }
        }
    }

    /// Drain one recorded response without waiting.
    pub fn try_next_response(&mut self) -> Option<SentResponse> {
        self.responses_rx.try_recv().ok()
    }

    /// Drain one recorded completion without waiting.
    pub fn try_next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.try_recv().ok()
    }
}
