//! Renders a typed builder unit.

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Visibility};

use crate::hierarchy::ResolvedField;
use crate::imports::{Import, rebase};

/// First line of every generated unit.
pub const GENERATED_HEADER: &str = "// @generated by entity_builder_codegen. Do not edit.";

/// Everything needed to render one unit.
pub(crate) struct UnitPlan<'a> {
    /// The target struct.
    pub target: &'a Ident,
    /// The target's visibility.
    pub vis: &'a Visibility,
    /// `crate::a::b::Target`, for docs.
    pub display_path: &'a str,
    /// Runtime crate path.
    pub krate: &'a syn::Path,
    /// Flattened fields, own first.
    pub fields: &'a [ResolvedField],
    /// Extra imports for inherited field types.
    pub imports: &'a [Import],
}

/// Name of the builder generated for `target`.
pub(crate) fn builder_ident(target: &Ident) -> Ident {
    format_ident!("{}Builder", target)
}

/// Setter name for a field called `name`.
pub(crate) fn setter_ident(name: &str) -> Ident {
    format_ident!("with_{}", name.to_snake_case())
}

/// Renders the unit as formatted source.
///
/// # Errors
///
/// Returns the parser message when the assembled tokens are not a valid
/// file, which happens only when a field type cannot be re-emitted.
pub(crate) fn render(plan: &UnitPlan<'_>) -> Result<String, String> {
    let tokens = unit_tokens(plan);
    let file: syn::File = syn::parse2(tokens).map_err(|err| err.to_string())?;
    Ok(format!(
        "{GENERATED_HEADER}\n// Source: {}\n\n{}",
        plan.display_path,
        prettyplease::unparse(&file)
    ))
}

fn unit_tokens(plan: &UnitPlan<'_>) -> TokenStream {
    let target = plan.target;
    let krate = plan.krate;
    let builder = builder_ident(target);
    let inner = format_ident!("__{}_builder", target.to_string().to_snake_case());
    let (struct_vis, reexport_vis) = visibilities(plan.vis);

    let imports = plan
        .imports
        .iter()
        .filter_map(Import::to_path)
        .map(|path| quote! { use #path; });
    let setters = plan.fields.iter().map(|resolved| {
        let name = resolved.field.name();
        let setter = setter_ident(&name);
        let ty = rebase(&resolved.field.ty, &resolved.owner);
        let doc = format!("Overrides `{name}`.");
        quote! {
            #[doc = #doc]
            pub fn #setter(self, value: #ty) -> Self {
                Self {
                    delegate: self.delegate.with(#name, value),
                }
            }
        }
    });
    let struct_doc = format!(
        "Typed builder for [`{target}`].\n\nUnset fields take their default when \
         [`{builder}::build`] runs. Generated from `{}`.",
        plan.display_path
    );

    quote! {
        mod #inner {
            use super::*;
            #(#imports)*

            #[doc = #struct_doc]
            #[derive(Debug, Default)]
            #[must_use]
            #struct_vis struct #builder {
                delegate: #krate::BuilderDelegate<#target>,
            }

            impl #builder {
                /// Starts a builder with every field at its default.
                pub fn new() -> Self {
                    Self::default()
                }

                #(#setters)*

                /// Routes this builder's diagnostics to `sink`.
                pub fn diagnostics(
                    self,
                    sink: ::std::sync::Arc<dyn #krate::DiagnosticSink>,
                ) -> Self {
                    Self {
                        delegate: self.delegate.with_sink(sink),
                    }
                }

                /// Fixes the clock used for date and date-time defaults.
                pub fn clock(self, clock: #krate::Clock) -> Self {
                    Self {
                        delegate: self.delegate.with_clock(clock),
                    }
                }

                /// Builds a new instance.
                ///
                /// # Errors
                ///
                /// Fails when the target cannot be constructed or an override
                /// cannot be applied.
                pub fn build(
                    &self,
                ) -> ::core::result::Result<#target, #krate::EntityBuilderError> {
                    self.delegate.build()
                }
            }

            impl #krate::HasBuilder for #target {
                type Builder = #builder;
            }
        }

        #reexport_vis use self::#inner::#builder;
    }
}

/// Visibility for the builder struct inside the wrapper module and for the
/// re-export in the target's module, keeping the builder exactly as visible
/// as its target.
fn visibilities(vis: &Visibility) -> (TokenStream, TokenStream) {
    match vis {
        Visibility::Public(_) => (quote!(pub), quote!(pub)),
        Visibility::Inherited => (quote!(pub(super)), TokenStream::new()),
        Visibility::Restricted(restricted) if restricted.path.is_ident("self") => {
            (quote!(pub(super)), TokenStream::new())
        }
        Visibility::Restricted(restricted) if restricted.path.is_ident("super") => {
            (quote!(pub(in super::super)), quote!(pub(super)))
        }
        Visibility::Restricted(_) => (quote!(pub(crate)), quote!(pub(crate))),
    }
}
