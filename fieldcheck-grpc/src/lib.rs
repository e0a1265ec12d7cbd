// Status from tonic is inherently large; this is acceptable for error handling
#![allow(clippy::result_large_err)]

//! # fieldcheck gRPC
//!
//! gRPC glue for fieldcheck validation.
//!
//! ## Features
//!
//! - **Status translation**: field failures become `InvalidArgument` with
//!   `google.rpc.BadRequest` field violations
//! - **Dialer**: lazily connected channels from a small serde config
//!
//! ## Quick Start
//!
//! ### Server handler
//!
//! ```rust,ignore
//! use fieldcheck_grpc::into_status;
//! use fieldcheck_validation::Validate;
//!
//! async fn create_user(&self, request: Request<CreateUser>) -> Result<Response<User>, Status> {
//!     let input = request.into_inner();
//!     into_status(input.validate())?;
//!     // ...
//! }
//! ```
//!
//! ### Client
//!
//! ```rust,ignore
//! use fieldcheck_grpc::{ServiceConfig, connect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = connect(&ServiceConfig::new("users.internal:50051").with_tls())?;
//!     let client = UsersClient::new(channel);
//!     Ok(())
//! }
//! ```

mod client;
pub mod details;
mod error;
mod status;

pub use client::{ServiceConfig, TlsConfig, connect};
pub use details::{BadRequest, FieldViolation};
pub use error::{GrpcError, Result};
pub use status::{
    INTERNAL_ERROR_MESSAGE, bad_request, internal_error, into_status, validation_error,
    validation_errors, validation_status,
};

// Re-export tonic types
pub use tonic::{Code, Status, transport::Channel};
