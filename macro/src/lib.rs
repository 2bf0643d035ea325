#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Not an issue in a macro crate"
)]
//! Procedural macros for compile-time SID and GUID literals.
mod expand;
use expand::{guid_impl, sid_impl};
use proc_macro::TokenStream;

use syn::{LitStr, parse_macro_input};

/// Parses a SID string (`"S-1-5-32-544"`) at compile time into an `adldap::Sid`.
///
/// The expansion is usable in `const` items.
#[proc_macro]
pub fn sid(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match sid_impl(&lit) {
        Ok(token_stream) => token_stream,
        Err(err) => err.to_compile_error(),
    }
    .into()
}

/// Parses a GUID string (`"f0e1d2c3-b4a5-9687-7869-5a4b3c2d1e0f"`) at compile
/// time into an `adldap::Guid` in directory byte order.
#[proc_macro]
pub fn guid(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    match guid_impl(&lit) {
        Ok(token_stream) => token_stream,
        Err(err) => err.to_compile_error(),
    }
    .into()
}
