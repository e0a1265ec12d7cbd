// Procedural macros for fieldcheck
// Generates field descriptors for validated structs

use proc_macro::TokenStream;

mod declaration;
mod validate;

/// Derives `Validate` and `ToValue` for a struct with named fields.
///
/// Every `pub` field is listed in declaration order. Attach rules with
/// `#[validate("required,gte=4")]`; `#[validate("-")]` leaves the field out
/// entirely. Fields without an attribute are still searched for nested
/// records.
///
/// ```ignore
/// #[derive(Validate)]
/// pub struct Account {
///     #[validate("required,username")]
///     pub user: String,
///     pub profile: Profile,
///     #[validate("-")]
///     pub raw: RawBytes,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate))]
pub fn validate_derive(input: TokenStream) -> TokenStream {
    validate::validate_derive_impl(input)
}
