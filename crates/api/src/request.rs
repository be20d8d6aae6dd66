//! Inbound request types.

use crate::Link;

/// Identifies one request within the scope of a single peer connection.
///
/// The requesting side picks the value; the responder treats it as opaque
/// and only requires it to be unique per peer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub i32);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Scheduling priority of a request, higher is more urgent.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Priority(pub i32);

impl Priority {
    /// The maximum expressible priority.
    pub const MAX: Priority = Priority(i32::MAX);
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// One inbound ask from a peer: either a new selector query to run, or a
/// cancellation of a previously submitted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphRequest {
    /// Start a new selector-guided traversal rooted at `root`.
    New {
        /// Request id, unique within the requesting peer's connection.
        id: RequestId,
        /// The content identifier the traversal starts from.
        root: Link,
        /// The encoded selector describing which parts of the graph to
        /// visit. Interpreted by the configured [SelectorEngine].
        ///
        /// [SelectorEngine]: crate::SelectorEngine
        selector: bytes::Bytes,
        /// Scheduling priority relative to the peer's other requests.
        priority: Priority,
    },
    /// Cancel the request previously submitted under `id`.
    Cancel {
        /// The id of the request to cancel.
        id: RequestId,
    },
}

impl GraphRequest {
    /// Construct a new-request entry.
    pub fn new(
        id: RequestId,
        root: Link,
        selector: bytes::Bytes,
        priority: Priority,
    ) -> Self {
        Self::New {
            id,
            root,
            selector,
            priority,
        }
    }

    /// Construct a cancellation entry for a previously submitted request.
    pub fn cancel(id: RequestId) -> Self {
        Self::Cancel { id }
    }

    /// The request id this entry refers to.
    pub fn id(&self) -> RequestId {
        match self {
            Self::New { id, .. } => *id,
            Self::Cancel { id } => *id,
        }
    }
}
