//! Declaration-driven validation for Rust structs
//!
//! Fields carry a short rule declaration such as `"required,gte=4,lte=20"`.
//! A [`Validator`] parses declarations once, runs the rule chain of every
//! field and walks nested records, sequences and mappings, collecting one
//! [`FieldError`] per failing field.
//!
//! # Examples
//!
//! ## Deriving
//!
//! ```
//! use fieldcheck_validation::Validate;
//!
//! #[derive(Validate)]
//! pub struct Signup {
//!     #[validate("required,username")]
//!     pub user: String,
//!     #[validate("required,email")]
//!     pub email: String,
//!     #[validate("optional,birthdate")]
//!     pub birthdate: Option<String>,
//! }
//!
//! let signup = Signup {
//!     user: "te".to_string(),
//!     email: "te@example.com".to_string(),
//!     birthdate: None,
//! };
//!
//! let err = signup.validate().unwrap_err();
//! assert_eq!(err.to_string(), "field is invalid: user");
//! ```
//!
//! ## Single values
//!
//! ```
//! use fieldcheck_validation::default_validator;
//!
//! let v = default_validator();
//! assert!(v.field("Europe/Amsterdam", "Zone", "zoneinfo").is_ok());
//! assert!(v.field(&3u8, "Count", "gte=5").is_err());
//! ```
//!
//! ## Custom rules and aliases
//!
//! ```
//! use fieldcheck_validation::{Rule, Validator, ValidatorConfig, Value};
//!
//! let even = Rule::new(
//!     "even",
//!     |value, _| match value {
//!         Value::Int(i) => Ok(i % 2 == 0),
//!         _ => Ok(false),
//!     },
//!     |field, _, _| format!("{} must be even", field),
//! );
//!
//! let validator = Validator::new(
//!     ValidatorConfig::builder()
//!         .standard_rules()
//!         .rule(even)
//!         .alias("pair", "required,even")
//!         .build(),
//! )
//! .unwrap();
//!
//! assert!(validator.field(&4i32, "N", "pair").is_ok());
//! assert!(validator.field(&3i32, "N", "pair").is_err());
//! ```

extern crate self as fieldcheck_validation;

mod config;
mod errors;
mod parser;
mod result;
mod rules;
mod traits;
mod validator;
pub mod validators;
mod value;

pub use config::*;
pub use errors::*;
pub use parser::{TagCache, parse_declaration, split_unescaped_commas};
pub use result::*;
pub use rules::*;
pub use traits::*;
pub use validator::*;
pub use validators::{INVALID_TIME, NOW, standard_aliases, standard_rules};
pub use value::*;

#[cfg(feature = "derive")]
pub use fieldcheck_macro::Validate;
