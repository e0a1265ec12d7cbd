// Composing results of independent checks

use crate::{Error, FieldError, FieldErrors, Result};
use std::fmt;

/// Accumulates field failures from several independent checks.
///
/// ```
/// use fieldcheck_validation::{default_validator, ValidationResult};
///
/// let v = default_validator();
/// let mut result = ValidationResult::new();
/// result.add(v.field("", "Name", "required")).unwrap();
/// result.add(v.field("male", "Gender", "gender")).unwrap();
///
/// assert!(!result.is_valid());
/// assert_eq!(result.to_string(), "field is invalid: Name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: FieldErrors,
}

impl ValidationResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the failures of several results.
    ///
    /// The first error that carries no field failures is returned instead.
    pub fn from_results(results: impl IntoIterator<Item = Result<()>>) -> Result<Self> {
        let mut composed = Self::new();
        for result in results {
            composed.add(result)?;
        }
        Ok(composed)
    }

    /// Whether no failure was recorded
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded failures
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// `Ok(())` when valid, otherwise every recorded failure
    pub fn err(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Fields(self.errors))
        }
    }

    /// Record a single failure
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Record all failures of a collection
    pub fn add_errors(&mut self, errors: FieldErrors) {
        self.errors.extend(errors);
    }

    /// Absorb field failures from an error.
    ///
    /// Any other kind of error is handed back unchanged so it can be
    /// propagated with `?`.
    pub fn add_error(&mut self, error: Error) -> Result<()> {
        match error {
            Error::Field(err) => {
                self.push(err);
                Ok(())
            }
            Error::Fields(errs) => {
                self.add_errors(errs);
                Ok(())
            }
            other => Err(other),
        }
    }

    /// Absorb the failures of a result, see [`add_error`](Self::add_error).
    pub fn add(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => self.add_error(err),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return Ok(());
        }
        write!(f, "{}", self.errors)
    }
}

impl From<ValidationResult> for FieldErrors {
    fn from(result: ValidationResult) -> Self {
        result.errors
    }
}

/// Flatten already evaluated single-field results into one failure.
///
/// Returns `Ok(())` when none failed. The first error that is not a field
/// failure is propagated as is.
pub fn fields(results: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    ValidationResult::from_results(results)?.err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UsageError;

    fn failed(field: &str) -> Result<()> {
        Err(Error::Field(FieldError::new(field, format!("{} is required", field))))
    }

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResult::new();
        assert!(result.is_valid());
        assert_eq!(result.to_string(), "");
        assert!(result.err().is_ok());
    }

    #[test]
    fn test_add_flattens() {
        let mut result = ValidationResult::new();
        result.add(failed("A")).unwrap();
        result
            .add_error(Error::Fields(FieldErrors::new(vec![
                FieldError::new("B", "b"),
                FieldError::new("C", "c"),
            ])))
            .unwrap();
        result.add(Ok(())).unwrap();

        assert_eq!(result.errors().len(), 3);
        assert_eq!(result.to_string(), "fields are invalid: A, B, C");
    }

    #[test]
    fn test_add_returns_unrecognized_errors() {
        let mut result = ValidationResult::new();
        let err = result
            .add_error(Error::Usage(UsageError::UnknownTag("x".into())))
            .unwrap_err();
        assert!(err.is_usage());
        assert!(result.is_valid());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(matches!(result.add_error(Error::other(io)), Err(Error::Other(_))));
    }

    #[test]
    fn test_fields_composer() {
        assert!(fields(vec![Ok(()), Ok(())]).is_ok());
        assert!(fields(Vec::new()).is_ok());

        match fields(vec![failed("A"), Ok(()), failed("B")]) {
            Err(Error::Fields(errs)) => assert_eq!(errs.to_string(), "fields are invalid: A, B"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fields_propagates_other_errors() {
        let usage = Err(Error::Usage(UsageError::unsupported("gte")));
        let err = fields(vec![failed("A"), usage, failed("B")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid type for gte tag");
    }
}
