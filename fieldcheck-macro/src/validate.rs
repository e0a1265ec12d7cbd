use crate::declaration::check_declaration;
use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Fields, GenericParam, LitStr, Visibility,
    parse_macro_input, parse_quote,
};

pub fn validate_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream2, Error> {
    expand_in(input, &crate_root())
}

/// Path to the engine as seen from the crate being compiled.
///
/// A direct `fieldcheck-validation` dependency wins; otherwise the engine is
/// reached through the `fieldcheck` facade.
fn crate_root() -> TokenStream2 {
    root_path(
        crate_name("fieldcheck-validation").ok(),
        crate_name("fieldcheck").ok(),
    )
}

fn root_path(engine: Option<FoundCrate>, facade: Option<FoundCrate>) -> TokenStream2 {
    match (engine, facade) {
        (Some(FoundCrate::Name(name)), _) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        (None, Some(FoundCrate::Name(name))) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident::__private)
        }
        _ => quote!(::fieldcheck_validation),
    }
}

fn expand_in(mut input: DeriveInput, root: &TokenStream2) -> Result<TokenStream2, Error> {
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => named.named.iter().collect::<Vec<_>>(),
        Data::Struct(DataStruct {
            fields: Fields::Unit,
            ..
        }) => Vec::new(),
        Data::Struct(DataStruct {
            fields: Fields::Unnamed(_),
            ..
        }) => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Validate)] requires named fields; tuple structs are not supported",
            ));
        }
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Validate)] can only be used on structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Validate)] can only be used on structs, not unions",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let declaration = declaration_of(&field.attrs)?;
        let Some(ident) = &field.ident else {
            continue;
        };

        if !matches!(field.vis, Visibility::Public(_)) {
            if let Some(declaration) = declaration {
                return Err(Error::new(
                    declaration.span(),
                    format!(
                        "#[validate] on private field `{}`\n\
                         hint: only `pub` fields are validated",
                        ident
                    ),
                ));
            }
            continue;
        }

        let declaration = declaration.map(|lit| (lit.value(), lit.span()));
        let decl = match &declaration {
            Some((decl, span)) => {
                check_declaration(decl, *span)?;
                if decl == "-" {
                    continue;
                }
                decl.clone()
            }
            None => String::new(),
        };

        let name = ident.unraw().to_string();
        entries.push(quote! {
            #root::Field::new(
                #name,
                #decl,
                #root::ToValue::to_value(&self.#ident),
            )
        });
    }

    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#root::ToValue));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #root::Validate for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<#root::Field<'_>> {
                ::std::vec![#(#entries),*]
            }
        }

        impl #impl_generics #root::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> #root::Value<'_> {
                #root::Value::Record(self)
            }
        }
    })
}

/// The single `#[validate("...")]` declaration of a field, if any
fn declaration_of(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
    let mut found: Option<LitStr> = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("validate")) {
        if found.is_some() {
            return Err(Error::new_spanned(
                attr,
                "duplicate #[validate] attribute\n\
                 hint: combine rules in one declaration, e.g. #[validate(\"required,email\")]",
            ));
        }

        let lit = attr.parse_args::<LitStr>().map_err(|_| {
            Error::new_spanned(
                attr,
                "expected a string declaration, e.g. #[validate(\"required,gte=3\")]",
            )
        })?;
        found = Some(lit);
    }

    Ok(found)
}
