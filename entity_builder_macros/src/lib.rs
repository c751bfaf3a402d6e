//! Derive macros for `entity_builder`.
//!
//! `#[derive(Entity)]` records a struct's field table, constructor hook and
//! setter dispatch so the runtime builder can populate it by field name.
//! `#[derive(EntityEnum)]` registers a unit-only enum whose first variant
//! becomes the default for fields of that type.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derives `entity_builder::Entity` for a struct with named fields.
///
/// Struct keys: `abstract`, `generate_builder`, `constructor = path`,
/// `try_constructor = path`, `no_constructor` and `crate = "path"`.
/// Field keys: `base` and `skip`.
///
/// The type must also implement `Clone`, and `Default` unless another
/// constructor is selected.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::entity::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `entity_builder::EntityEnum` for an enum of unit variants.
#[proc_macro_derive(EntityEnum, attributes(entity))]
pub fn derive_entity_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::enumeration::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
