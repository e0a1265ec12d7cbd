//! gRPC error types.

use thiserror::Error;
use tonic::Status;

/// Result type for gRPC operations.
pub type Result<T> = std::result::Result<T, GrpcError>;

/// gRPC errors.
#[derive(Debug, Error)]
pub enum GrpcError {
    /// Transport error.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GrpcError {
    /// Convert to a tonic Status.
    pub fn to_status(&self) -> Status {
        match self {
            Self::Transport(e) => Status::unavailable(e.to_string()),
            Self::Config(msg) => Status::failed_precondition(msg),
        }
    }
}

impl From<GrpcError> for Status {
    fn from(err: GrpcError) -> Self {
        err.to_status()
    }
}
