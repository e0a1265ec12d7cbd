// Validation errors

use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// Result type for validation calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("field is invalid: {field}")]
pub struct FieldError {
    /// Field name, or dotted path when full error paths are enabled
    pub field: String,

    /// Human readable description of the failure
    pub description: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }

    /// Prefix the field with the name of its parent
    pub(crate) fn nested_under(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            description: self.description,
        }
    }
}

/// Ordered collection of field errors.
///
/// Order follows traversal order: declared field order for records,
/// element order for sequences and iteration order for mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Create a new field errors collection
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// Add an error
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Get errors for a specific field
    pub fn get_field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.field == field).collect()
    }

    /// Consume the collection and return the inner errors
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.to_string(),
            "errors": self.0.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "description": e.description,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl Deref for FieldErrors {
    type Target = [FieldError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() == 1 {
            f.write_str("field is invalid: ")?;
        } else {
            f.write_str("fields are invalid: ")?;
        }

        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&error.field)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<Vec<FieldError>> for FieldErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::new(errors)
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Programmer or configuration defect.
///
/// Usage errors are never collected into [`FieldErrors`]; they abort the
/// validation call that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Declaration names a rule or alias that is not registered.
    #[error("unknown validate tag {0:?}")]
    UnknownTag(String),

    /// Declaration contains an empty rule name.
    #[error("empty validate tag in declaration {0:?}")]
    EmptyTag(String),

    /// Rule was applied to a value kind it cannot check.
    #[error("invalid type for {tag} tag")]
    UnsupportedType { tag: String },

    /// Rule parameter could not be interpreted.
    #[error("cannot cast {param:?} to {expected} for {tag} tag")]
    InvalidParam {
        tag: String,
        param: String,
        expected: &'static str,
    },
}

impl UsageError {
    /// Create an unsupported type error for a tag
    pub fn unsupported(tag: impl Into<String>) -> Self {
        Self::UnsupportedType { tag: tag.into() }
    }

    /// Create an invalid parameter error for a tag
    pub fn invalid_param(
        tag: impl Into<String>,
        param: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidParam {
            tag: tag.into(),
            param: param.into(),
            expected,
        }
    }
}

/// Errors returned by validation calls.
#[derive(Debug, Error)]
pub enum Error {
    /// A single field failed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// One or more fields failed.
    #[error(transparent)]
    Fields(#[from] FieldErrors),

    /// The validation call was misconfigured.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Any other error surfaced while composing results.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary error
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }

    /// Whether this error reports input failures rather than a defect
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Field(_) | Self::Fields(_))
    }

    /// Whether this error is a programmer or configuration defect
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Field failures carried by this error, flattened
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Field(e) => Some(FieldErrors::from(e.clone())),
            Self::Fields(e) => Some(e.clone()),
            _ => None,
        }
    }
}
