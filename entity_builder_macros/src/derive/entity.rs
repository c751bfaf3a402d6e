//! Expansion of `#[derive(Entity)]`.

use entity_builder_codegen::model::{Constructor, EntityModel};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput};

use super::crate_path;

/// Expands the derive for `input`.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Entity can only be derived for structs",
        ));
    };
    let model = EntityModel::from_parts(
        &input.ident,
        &input.vis,
        &input.attrs,
        &input.generics,
        &data.fields,
    )?;
    let krate = crate_path::resolve(model.attrs.crate_path.as_ref());
    let ident = &model.ident;

    let entity_type = entity_type_fn(&model, &krate);
    let construct = construct_fn(&model, &krate);
    let assign = assign_fn(&model, &krate);

    Ok(quote! {
        impl #krate::Entity for #ident {
            #entity_type
            #construct
            #assign
        }

        impl #krate::FieldValue for #ident {
            fn field_type() -> #krate::FieldType {
                #krate::FieldType::nominal::<Self>()
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

fn entity_type_fn(model: &EntityModel, krate: &TokenStream) -> TokenStream {
    let name = model.ident.unraw().to_string();
    let fields = model.fields.iter().map(|field| {
        let ty = &field.ty;
        let field_name = field.name();
        quote! {
            .with_field(#krate::FieldDescriptor::of::<#ty>(#field_name, #name))
        }
    });
    let parent = model.base.as_ref().map(|base| {
        let ty = &base.ty;
        quote! { .with_parent(<#ty as #krate::Entity>::entity_type) }
    });
    let is_abstract = model
        .attrs
        .is_abstract
        .then(|| quote! { .into_abstract() });
    quote! {
        fn entity_type() -> &'static #krate::EntityType {
            static ENTITY_TYPE: #krate::__private::OnceLock<#krate::EntityType> =
                #krate::__private::OnceLock::new();
            ENTITY_TYPE.get_or_init(|| {
                #krate::EntityType::new::<Self>(#name)
                    #(#fields)*
                    #parent
                    #is_abstract
            })
        }
    }
}

fn construct_fn(model: &EntityModel, krate: &TokenStream) -> TokenStream {
    let body = if model.attrs.is_abstract {
        quote! { ::core::result::Result::Err(#krate::ConstructError::Abstract) }
    } else {
        match &model.attrs.constructor {
            Constructor::Default => quote! {
                ::core::result::Result::Ok(<Self as ::core::default::Default>::default())
            },
            Constructor::Infallible(path) => quote! {
                ::core::result::Result::Ok(#path())
            },
            Constructor::Fallible(path) => quote! {
                #path().map_err(|err| #krate::ConstructError::failed(&err))
            },
            Constructor::Missing => quote! {
                ::core::result::Result::Err(#krate::ConstructError::Missing)
            },
        }
    };
    quote! {
        fn construct() -> ::core::result::Result<Self, #krate::ConstructError> {
            #body
        }
    }
}

fn assign_fn(model: &EntityModel, krate: &TokenStream) -> TokenStream {
    let value = if model.fields.is_empty() && model.base.is_none() {
        format_ident!("_value")
    } else {
        format_ident!("value")
    };
    let arms = model.fields.iter().map(|field| {
        let member = &field.ident;
        let ty = &field.ty;
        let field_name = field.name();
        quote! {
            #field_name => {
                self.#member = <#ty as #krate::FieldValue>::from_value(#value)
                    .map_err(|err| err.for_field(field))?;
                ::core::result::Result::Ok(())
            }
        }
    });
    let fallback = model.base.as_ref().map_or_else(
        || {
            quote! {
                _ => ::core::result::Result::Err(#krate::AssignError::UnknownField(
                    ::std::borrow::ToOwned::to_owned(field),
                )),
            }
        },
        |base| {
            let member = &base.ident;
            let ty = &base.ty;
            quote! {
                _ => <#ty as #krate::Entity>::assign(&mut self.#member, field, #value),
            }
        },
    );
    quote! {
        fn assign(
            &mut self,
            field: &str,
            #value: #krate::Value,
        ) -> ::core::result::Result<(), #krate::AssignError> {
            match field {
                #(#arms)*
                #fallback
            }
        }
    }
}
