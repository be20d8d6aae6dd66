//! Wire protocol types for the graph-synchronization message surface.
//!
//! Transports exchange a single [WeftMessage] envelope carrying any mix of
//! requests, response statuses and raw blocks. The responder core itself only
//! consumes decoded [GraphRequest] values; these types exist so network
//! bindings can move between the wire form and the api form.

use crate::{GraphRequest, Link, Priority, RequestId, WeftError, WeftResult};
use bytes::{Bytes, BytesMut};
use prost::Message;

/// Protocol-level status code ending or annotating a response stream.
///
/// The taxonomy is defined by the protocol, not by the responder core; the
/// core only ever selects among [RequestCompletedFull],
/// [RequestFailedContentNotFound], [RequestFailedUnknown] and
/// [RequestCancelled].
///
/// [RequestCompletedFull]: ResponseStatusCode::RequestCompletedFull
/// [RequestFailedContentNotFound]: ResponseStatusCode::RequestFailedContentNotFound
/// [RequestFailedUnknown]: ResponseStatusCode::RequestFailedUnknown
/// [RequestCancelled]: ResponseStatusCode::RequestCancelled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum ResponseStatusCode {
    /// The request was received and is being worked on.
    RequestAcknowledged = 10,
    /// The partial data in this message is a portion of the response.
    PartialResponse = 14,
    /// The request completed and the whole selection was sent.
    RequestCompletedFull = 20,
    /// The request completed but only part of the selection was sent.
    RequestCompletedPartial = 21,
    /// The responder refused to serve the request.
    RequestRejected = 30,
    /// The responder is too busy to serve the request right now.
    RequestFailedBusy = 31,
    /// The request failed for an unspecified reason.
    RequestFailedUnknown = 32,
    /// The responder may not legally serve the request.
    RequestFailedLegal = 33,
    /// A block required by the selection was not present in the local store.
    RequestFailedContentNotFound = 34,
    /// The request was cancelled before it completed.
    RequestCancelled = 35,
}

impl ResponseStatusCode {
    /// Decode a wire value, if it names a known status.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            10 => Some(Self::RequestAcknowledged),
            14 => Some(Self::PartialResponse),
            20 => Some(Self::RequestCompletedFull),
            21 => Some(Self::RequestCompletedPartial),
            30 => Some(Self::RequestRejected),
            31 => Some(Self::RequestFailedBusy),
            32 => Some(Self::RequestFailedUnknown),
            33 => Some(Self::RequestFailedLegal),
            34 => Some(Self::RequestFailedContentNotFound),
            35 => Some(Self::RequestCancelled),
            _ => None,
        }
    }

    /// True if this status ends the stream successfully.
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            Self::RequestCompletedFull | Self::RequestCompletedPartial
        )
    }

    /// True if this status ends the stream with a failure.
    pub fn is_failure(&self) -> bool {
        *self as i32 >= Self::RequestRejected as i32
    }
}

/// Wire form of one request entry.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestProto {
    /// Request id, unique within the sending peer's connection.
    #[prost(int32, tag = "1")]
    pub id: i32,
    /// Root content identifier of the traversal.
    #[prost(bytes = "bytes", tag = "2")]
    pub root: Bytes,
    /// Encoded selector.
    #[prost(bytes = "bytes", tag = "3")]
    pub selector: Bytes,
    /// Scheduling priority.
    #[prost(int32, tag = "4")]
    pub priority: i32,
    /// True if this entry cancels the request named by `id`.
    #[prost(bool, tag = "5")]
    pub cancel: bool,
}

/// Wire form of one response status entry.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ResponseProto {
    /// The request this status refers to.
    #[prost(int32, tag = "1")]
    pub id: i32,
    /// A [ResponseStatusCode] as its wire value.
    #[prost(int32, tag = "2")]
    pub status: i32,
}

impl ResponseProto {
    /// The decoded status code, if it names a known status.
    pub fn status(&self) -> Option<ResponseStatusCode> {
        ResponseStatusCode::from_i32(self.status)
    }
}

/// Wire form of one raw block.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BlockProto {
    /// The block's content identifier.
    #[prost(bytes = "bytes", tag = "1")]
    pub link: Bytes,
    /// The raw block bytes.
    #[prost(bytes = "bytes", tag = "2")]
    pub data: Bytes,
}

/// The protocol message envelope.
#[derive(Clone, PartialEq, prost::Message)]
pub struct WeftMessage {
    /// Request entries (new requests and cancellations).
    #[prost(message, repeated, tag = "1")]
    pub requests: Vec<RequestProto>,
    /// Response status entries.
    #[prost(message, repeated, tag = "2")]
    pub responses: Vec<ResponseProto>,
    /// Raw blocks referenced by the response entries.
    #[prost(message, repeated, tag = "3")]
    pub blocks: Vec<BlockProto>,
}

impl From<GraphRequest> for RequestProto {
    fn from(value: GraphRequest) -> Self {
        match value {
            GraphRequest::New {
                id,
                root,
                selector,
                priority,
            } => Self {
                id: id.0,
                root: root.0 .0,
                selector,
                priority: priority.0,
                cancel: false,
            },
            GraphRequest::Cancel { id } => Self {
                id: id.0,
                root: Bytes::new(),
                selector: Bytes::new(),
                priority: 0,
                cancel: true,
            },
        }
    }
}

impl From<RequestProto> for GraphRequest {
    fn from(value: RequestProto) -> Self {
        if value.cancel {
            GraphRequest::cancel(RequestId(value.id))
        } else {
            GraphRequest::new(
                RequestId(value.id),
                Link::from(value.root),
                value.selector,
                Priority(value.priority),
            )
        }
    }
}

/// Serialize a list of request entries into a message envelope.
pub fn serialize_requests(value: Vec<GraphRequest>) -> WeftResult<Bytes> {
    let mut out = BytesMut::new();
    let message = WeftMessage {
        requests: value.into_iter().map(Into::into).collect(),
        responses: Vec::new(),
        blocks: Vec::new(),
    };
    message
        .encode(&mut out)
        .map_err(|err| WeftError::other_src("failed to encode message", err))?;
    Ok(out.freeze())
}

/// Deserialize a message envelope.
pub fn deserialize_message(value: Bytes) -> WeftResult<WeftMessage> {
    WeftMessage::decode(value)
        .map_err(|err| WeftError::other_src("failed to decode message", err))
}
