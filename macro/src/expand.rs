use parsing::{GuidComponents, SidComponents};
use proc_macro_crate::{Error as MacroCrateError, FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::quote;
use syn::LitStr;

pub fn sid_impl(input: &LitStr) -> Result<TokenStream, syn::Error> {
    let components: SidComponents = input
        .value()
        .parse()
        .map_err(|e| syn::Error::new_spanned(input, e))?;
    let revision = components.revision;
    let authority = components.identifier_authority;
    let sub_authority = components.sub_authority.as_slice();
    let root = root_path()?;

    let expanded = quote! {
        match #root::Sid::from_array(
            #revision,
            #root::SidIdentifierAuthority::new([#(#authority),*]),
            [#(#sub_authority),*],
        ) {
            ::core::option::Option::Some(sid) => sid,
            ::core::option::Option::None => ::core::unreachable!(),
        }
    };
    Ok(expanded)
}

pub fn guid_impl(input: &LitStr) -> Result<TokenStream, syn::Error> {
    let components: GuidComponents = input
        .value()
        .parse()
        .map_err(|e| syn::Error::new_spanned(input, e))?;
    let [g1, g2, g3, g4, g5] = components.groups;
    let g1 = g1.iter().rev();
    let g2 = g2.iter().rev();
    let g3 = g3.iter().rev();
    let g4 = g4.iter();
    let g5 = g5.iter();
    let root = root_path()?;

    let expanded = quote! {
        #root::Guid::from_bytes([#(#g1,)* #(#g2,)* #(#g3,)* #(#g4,)* #(#g5),*])
    };
    Ok(expanded)
}

fn root_path() -> Result<TokenStream, syn::Error> {
    crate_root("adldap").map_err(|err| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            format!("Root crate not found:{err}"),
        )
    })
}

fn crate_root(name: &str) -> Result<TokenStream, MacroCrateError> {
    crate_name(name).map(|found| {
        // `adldap` declares `extern crate self as adldap`, so its own name
        // resolves in unit tests, integration tests and doctests alike.
        let found_name = match found {
            FoundCrate::Name(found_name) => found_name,
            FoundCrate::Itself => name.to_owned(),
        };
        let ident = syn::Ident::new(&found_name, proc_macro2::Span::call_site());
        quote!(::#ident)
    })
}
