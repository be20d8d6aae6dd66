//! Test utilities associated with ids.

use bytes::Bytes;
use graphweft_api::{id::Id, Link, PeerId, RequestId};

use crate::random_bytes;

/// Create a random id.
pub fn random_id() -> Id {
    Id(Bytes::from(random_bytes(32)))
}

/// Create a random peer id.
pub fn random_peer_id() -> PeerId {
    PeerId(random_id())
}

/// Create a random link.
pub fn random_link() -> Link {
    Link(random_id())
}

/// Create a random request id.
pub fn random_request_id() -> RequestId {
    RequestId(rand::random::<i32>())
}
