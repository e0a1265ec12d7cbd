// fieldcheck - declaration-driven struct validation for Rust
//
// This library validates records from short per-field rule declarations,
// walks nested values and reports one failure per field.

// Re-export the validation engine
pub use fieldcheck_validation::*;

// Path used by #[derive(Validate)] when only this crate is a dependency
#[doc(hidden)]
pub use fieldcheck_validation as __private;

// Re-export optional crates
#[cfg(feature = "grpc")]
pub use fieldcheck_grpc;

/// Prelude for common imports.
///
/// ```
/// use fieldcheck::prelude::*;
///
/// #[derive(Validate)]
/// pub struct Login {
///     #[validate("required,username")]
///     pub user: String,
/// }
///
/// assert!(Login { user: "hello_1".into() }.validate().is_ok());
/// ```
pub mod prelude {
    pub use fieldcheck_validation::{
        Error, Field, FieldError, FieldErrors, Result, ToValue, UsageError, Validate,
        ValidationResult, Validator, ValidatorConfig, Value, default_validator, fields,
    };

    #[cfg(feature = "grpc")]
    pub use fieldcheck_grpc::{ServiceConfig, bad_request, connect, internal_error, into_status};
}
