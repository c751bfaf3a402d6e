//! Expansion of `#[derive(EntityEnum)]`.

use entity_builder_codegen::model::parse_enum_attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use super::crate_path;

/// Expands the derive for `input`.
///
/// A `generate_builder` marker is accepted and ignored here; the builder
/// generator reports it against the enum.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "EntityEnum can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "EntityEnum cannot be derived for generic enums",
        ));
    }
    if let Some(variant) = data
        .variants
        .iter()
        .find(|variant| !matches!(variant.fields, Fields::Unit))
    {
        return Err(syn::Error::new_spanned(
            variant,
            "EntityEnum variants must not carry data",
        ));
    }
    let attrs = parse_enum_attrs(&input.attrs)?;
    let krate = crate_path::resolve(attrs.crate_path.as_ref());
    let ident = &input.ident;
    let variants = data.variants.iter().map(|variant| &variant.ident);

    Ok(quote! {
        impl #krate::EntityEnum for #ident {
            const VARIANTS: &'static [Self] = &[#(Self::#variants),*];
        }

        impl #krate::FieldValue for #ident {
            fn field_type() -> #krate::FieldType {
                #krate::FieldType::enumeration::<Self>()
            }

            fn from_value(
                value: #krate::Value,
            ) -> ::core::result::Result<Self, #krate::AssignError> {
                #krate::__private::object_from_value(value)
            }
        }

        impl #krate::IntoValue for #ident {
            fn into_value(self) -> #krate::Value {
                #krate::Value::object(self)
            }
        }
    })
}
