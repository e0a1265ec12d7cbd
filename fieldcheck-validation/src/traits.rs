// Validation traits

use crate::{Result, Value, default_validator};

/// Declaration that disables validation of a field entirely.
pub const SKIP: &str = "-";

/// A record whose fields can be validated.
///
/// Usually generated with `#[derive(Validate)]`. Manual implementations list
/// the publicly visible fields in declaration order.
///
/// ```
/// use fieldcheck_validation::{Field, ToValue, Validate};
///
/// struct Login {
///     user: String,
/// }
///
/// impl Validate for Login {
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![Field::new("user", "required,username", self.user.to_value())]
///     }
/// }
///
/// assert!(Login { user: "hello_1".into() }.validate().is_ok());
/// assert!(Login { user: String::new() }.validate().is_err());
/// ```
pub trait Validate {
    /// Fields of this record, in declaration order
    fn fields(&self) -> Vec<Field<'_>>;

    /// Validate with the default validator
    fn validate(&self) -> Result<()>
    where
        Self: Sized,
    {
        default_validator().validate(self)
    }
}

/// Conversion into the closed set of value kinds the engine understands.
pub trait ToValue {
    /// Borrowed view of this value
    fn to_value(&self) -> Value<'_>;
}

/// One field of a record as seen by the traverser.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Name reported in field errors
    pub name: &'a str,

    /// Rule declaration, empty when the field has none
    pub declaration: &'a str,

    /// Current value of the field
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    /// Create a new field
    pub fn new(name: &'a str, declaration: &'a str, value: Value<'a>) -> Self {
        Self {
            name,
            declaration,
            value,
        }
    }

    /// Create a field without a declaration; it is only traversed
    pub fn untagged(name: &'a str, value: Value<'a>) -> Self {
        Self::new(name, "", value)
    }

    /// Whether the declaration disables validation
    pub fn is_skipped(&self) -> bool {
        self.declaration == SKIP
    }
}
