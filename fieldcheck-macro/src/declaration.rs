//! Compile-time declaration checks
//!
//! Rule names are resolved at runtime against the validator's registry, so
//! only the grammar is checked here:
//! - The declaration is not empty
//! - No rule name is empty after trimming
//! - `-` stands alone

use proc_macro2::Span;
use syn::Error;

/// Check the grammar of a declaration string
pub fn check_declaration(declaration: &str, span: Span) -> Result<(), Error> {
    if declaration.is_empty() {
        return Err(Error::new(
            span,
            "empty validate declaration\n\
             hint: remove the attribute or use \"-\" to skip the field",
        ));
    }

    if declaration == "-" {
        return Ok(());
    }

    for piece in split_unescaped(declaration) {
        let name = match piece.split_once('=') {
            Some((name, _)) => name,
            None => piece,
        };
        let name = name.trim_matches(' ');

        if name.is_empty() {
            return Err(Error::new(
                span,
                format!("empty rule name in validate declaration \"{}\"", declaration),
            ));
        }

        if name == "-" {
            return Err(Error::new(
                span,
                format!(
                    "\"-\" cannot be combined with other rules: \"{}\"\n\
                     hint: use #[validate(\"-\")] on its own",
                    declaration
                ),
            ));
        }
    }

    Ok(())
}

fn split_unescaped(declaration: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut backslashes = 0usize;

    for (i, c) in declaration.char_indices() {
        match c {
            '\\' => backslashes += 1,
            ',' if backslashes % 2 == 0 => {
                pieces.push(&declaration[start..i]);
                start = i + 1;
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
    }

    pieces.push(&declaration[start..]);
    pieces
}
