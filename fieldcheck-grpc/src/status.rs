//! Translation of validation errors into gRPC statuses.

use crate::details::{BadRequest, FieldViolation, RpcStatus};
use bytes::Bytes;
use fieldcheck_validation::{Error, FieldError, FieldErrors};
use prost::Message;
use tonic::{Code, Status};
use tracing::error;

/// Message of [`internal_error`].
pub const INTERNAL_ERROR_MESSAGE: &str = "something went wrong, please try again later";

/// Generic internal failure that reveals nothing to the caller.
pub fn internal_error() -> Status {
    Status::internal(INTERNAL_ERROR_MESSAGE)
}

/// Status for a failed validation call.
///
/// Field failures become `InvalidArgument` with one `FieldViolation` per
/// failure; an empty collection yields `None`. Anything else is reported as
/// `Internal`.
pub fn validation_status(err: &Error) -> Option<Status> {
    match err {
        Error::Field(field) => Some(validation_error(field)),
        Error::Fields(fields) => validation_errors(fields),
        other => {
            error!(error = %other, "unexpected error while translating validation failure");
            Some(Status::internal(format!("unexpected error type: {}", other)))
        }
    }
}

/// `InvalidArgument` status for a collection of failures, `None` when empty.
pub fn validation_errors(errors: &FieldErrors) -> Option<Status> {
    if errors.is_empty() {
        return None;
    }
    Some(invalid_argument(errors.to_string(), errors.iter()))
}

/// `InvalidArgument` status for a single failure.
pub fn validation_error(error: &FieldError) -> Status {
    invalid_argument(error.to_string(), std::iter::once(error))
}

/// Map the error of a validation call to a status.
///
/// ```
/// use fieldcheck_grpc::into_status;
/// use fieldcheck_validation::default_validator;
///
/// let status = into_status(default_validator().field("", "Name", "required")).unwrap_err();
/// assert_eq!(status.code(), tonic::Code::InvalidArgument);
/// assert_eq!(status.message(), "field is invalid: Name");
/// ```
pub fn into_status(result: Result<(), Error>) -> Result<(), Status> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => match validation_status(&err) {
            Some(status) => Err(status),
            None => Ok(()),
        },
    }
}

/// Field violations carried by a status, if any.
pub fn bad_request(status: &Status) -> Option<BadRequest> {
    let details = RpcStatus::decode(status.details()).ok()?;
    details.details.iter().find_map(BadRequest::from_any)
}

fn invalid_argument<'a>(
    message: String,
    errors: impl Iterator<Item = &'a FieldError>,
) -> Status {
    let request = BadRequest {
        field_violations: errors
            .map(|err| FieldViolation {
                field: err.field.clone(),
                description: err.description.clone(),
            })
            .collect(),
    };

    let details = RpcStatus {
        code: Code::InvalidArgument as i32,
        message: message.clone(),
        details: vec![request.to_any()],
    };

    Status::with_details(
        Code::InvalidArgument,
        message,
        Bytes::from(details.encode_to_vec()),
    )
}
