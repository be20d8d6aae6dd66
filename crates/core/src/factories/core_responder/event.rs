use graphweft_api::{
    GraphRequest, Link, PeerId, RequestId, ResponseStatusCode,
};
use std::sync::{atomic::AtomicBool, Arc};
use tokio::sync::oneshot;

/// Identifies one tracked response. Request ids are only unique within a
/// peer's connection scope, so the peer id is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct ResponseKey {
    pub(super) peer: PeerId,
    pub(super) request: RequestId,
}

impl std::fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.peer, self.request)
    }
}

/// Lifecycle of one tracked request.
///
/// Terminal states are not represented: the entry is removed at the moment
/// its single completion call is emitted, or, for a cancel-before-pickup,
/// with no completion at all.
#[derive(Debug)]
pub(super) enum QueryState {
    /// Waiting in the query queue.
    Queued {
        root: Link,
        selector: bytes::Bytes,
    },
    /// A worker is running the traversal.
    Active { cancel: Arc<AtomicBool> },
    /// Cancelled while active. The executor will observe the flag and
    /// report a finish, which emits the cancelled completion.
    Cancelled,
}

/// Everything the executor needs to run one claimed query.
#[derive(Debug)]
pub(super) struct ActiveQuery {
    pub(super) root: Link,
    pub(super) selector: bytes::Bytes,
    pub(super) cancel: Arc<AtomicBool>,
}

/// How one executor run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum QueryOutcome {
    Completed,
    Cancelled,
    Errored(ResponseStatusCode),
}

/// Control loop events. Everything that mutates scheduling state arrives
/// here; the loop is the single writer of the state map.
#[derive(Debug)]
pub(super) enum Event {
    Requests {
        peer: PeerId,
        requests: Vec<GraphRequest>,
    },
    StartQuery {
        key: ResponseKey,
        reply: oneshot::Sender<Option<ActiveQuery>>,
    },
    FinishQuery {
        key: ResponseKey,
        outcome: QueryOutcome,
    },
    Synchronize {
        reply: oneshot::Sender<()>,
    },
}
