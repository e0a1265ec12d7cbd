//! `google.rpc` error detail messages.
//!
//! Only the messages needed to report field violations are declared; they
//! are wire compatible with `google/rpc/status.proto` and
//! `google/rpc/error_details.proto`.

use prost::Message;
use prost_types::Any;

/// Type URL of a packed [`BadRequest`].
pub const BAD_REQUEST_TYPE_URL: &str = "type.googleapis.com/google.rpc.BadRequest";

/// `google.rpc.Status`, carried in the `grpc-status-details-bin` trailer.
#[derive(Clone, PartialEq, Message)]
pub struct RpcStatus {
    /// Status code, see `tonic::Code`
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// Developer facing message
    #[prost(string, tag = "2")]
    pub message: String,
    /// Packed detail messages
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<Any>,
}

/// `google.rpc.BadRequest`: the request contained invalid fields.
#[derive(Clone, PartialEq, Message)]
pub struct BadRequest {
    /// One entry per invalid field, in reporting order
    #[prost(message, repeated, tag = "1")]
    pub field_violations: Vec<FieldViolation>,
}

/// `google.rpc.BadRequest.FieldViolation`
#[derive(Clone, PartialEq, Message)]
pub struct FieldViolation {
    /// Path of the invalid field
    #[prost(string, tag = "1")]
    pub field: String,
    /// Why the field is invalid
    #[prost(string, tag = "2")]
    pub description: String,
}

impl BadRequest {
    /// Pack into an `Any`
    pub fn to_any(&self) -> Any {
        Any {
            type_url: BAD_REQUEST_TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }

    /// Unpack from an `Any`, `None` for other detail types or bad bytes
    pub fn from_any(any: &Any) -> Option<Self> {
        if any.type_url != BAD_REQUEST_TYPE_URL {
            return None;
        }
        Self::decode(any.value.as_slice()).ok()
    }
}
