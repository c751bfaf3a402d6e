//! The `#[entity(...)]` attribute model.
//!
//! Shared by the derive macros and the builder generator so both read the
//! same struct shapes and the same keys. Unknown keys are rejected: a typo in
//! `generate_builder` would otherwise silently skip generation.
//!
//! Struct keys:
//! - `abstract` marks an entity usable only as a base.
//! - `generate_builder` marks the struct for typed-builder generation.
//! - `constructor = path` names an infallible `fn() -> Self`.
//! - `try_constructor = path` names a `fn() -> Result<Self, E>`.
//! - `no_constructor` declares that the type cannot be instantiated.
//! - `crate = "path"` overrides the runtime crate path in generated code.
//!
//! Field keys:
//! - `base` embeds the parent entity; at most one field may carry it.
//! - `skip` hides the field from resolution, defaults and setters.

use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Fields, Generics, Ident, Type, Visibility};

mod literals;

use literals::lit_str;

/// Name of the helper attribute.
pub const ATTRIBUTE: &str = "entity";

/// How the runtime builder instantiates an entity.
#[derive(Clone, Default)]
pub enum Constructor {
    /// `Default::default()`.
    #[default]
    Default,
    /// A user function returning `Self`.
    Infallible(syn::Path),
    /// A user function returning `Result<Self, E>`.
    Fallible(syn::Path),
    /// No constructor is available.
    Missing,
}

/// Struct-level `#[entity(...)]` keys.
#[derive(Clone, Default)]
pub struct EntityAttrs {
    /// `abstract` was present.
    pub is_abstract: bool,
    /// `generate_builder` was present.
    pub generate_builder: bool,
    /// Selected constructor.
    pub constructor: Constructor,
    /// `crate = "..."` override.
    pub crate_path: Option<syn::Path>,
}

/// Field-level `#[entity(...)]` keys.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct FieldAttrs {
    /// The field embeds the parent entity.
    pub base: bool,
    /// The field is invisible to the builder.
    pub skip: bool,
}

/// `#[entity(...)]` keys accepted on enums.
#[derive(Clone, Default)]
pub struct EnumAttrs {
    /// `crate = "..."` override.
    pub crate_path: Option<syn::Path>,
    /// `generate_builder` was present. Enums cannot have builders; the
    /// generator reports the marker instead of the compiler.
    pub generate_builder: bool,
}

/// A named field the builder can populate.
#[derive(Clone)]
pub struct EntityField {
    /// Field identifier.
    pub ident: Ident,
    /// Declared type.
    pub ty: Type,
}

impl EntityField {
    /// Field name with any `r#` prefix removed.
    #[must_use]
    pub fn name(&self) -> String {
        syn::ext::IdentExt::unraw(&self.ident).to_string()
    }
}

/// A struct read as an entity.
#[derive(Clone)]
pub struct EntityModel {
    /// Struct identifier.
    pub ident: Ident,
    /// Struct visibility.
    pub vis: Visibility,
    /// Struct-level keys.
    pub attrs: EntityAttrs,
    /// Own fields in declaration order, excluding `base` and `skip` fields.
    pub fields: Vec<EntityField>,
    /// The `base` field, if any.
    pub base: Option<EntityField>,
}

impl EntityModel {
    /// Reads an entity from the parts of a struct definition.
    ///
    /// # Errors
    ///
    /// Fails for generic or tuple structs and for malformed attributes.
    pub fn from_parts(
        ident: &Ident,
        vis: &Visibility,
        attrs: &[Attribute],
        generics: &Generics,
        fields: &Fields,
    ) -> syn::Result<Self> {
        check_shape(ident, generics, fields)?;
        let entity_attrs = parse_entity_attrs(attrs)?;
        let mut own = Vec::new();
        let mut base: Option<EntityField> = None;
        for field in fields {
            let Some(field_ident) = field.ident.clone() else {
                continue;
            };
            let field_attrs = parse_field_attrs(&field.attrs)?;
            let entry = EntityField {
                ident: field_ident,
                ty: field.ty.clone(),
            };
            match (field_attrs.base, field_attrs.skip) {
                (true, true) => {
                    return Err(syn::Error::new(
                        field.span(),
                        "a field cannot be both `base` and `skip`",
                    ));
                }
                (true, false) if base.is_some() => {
                    return Err(syn::Error::new(
                        field.span(),
                        "an entity can embed at most one `base` entity",
                    ));
                }
                (true, false) => base = Some(entry),
                (false, true) => {}
                (false, false) => own.push(entry),
            }
        }
        Ok(Self {
            ident: ident.clone(),
            vis: vis.clone(),
            attrs: entity_attrs,
            fields: own,
            base,
        })
    }

    /// Reads an entity from a parsed struct item.
    ///
    /// # Errors
    ///
    /// See [`EntityModel::from_parts`].
    pub fn from_item(item: &syn::ItemStruct) -> syn::Result<Self> {
        Self::from_parts(
            &item.ident,
            &item.vis,
            &item.attrs,
            &item.generics,
            &item.fields,
        )
    }
}

/// Rejects struct shapes the runtime cannot describe.
///
/// # Errors
///
/// Fails for generic structs and tuple structs.
pub fn check_shape(ident: &Ident, generics: &Generics, fields: &Fields) -> syn::Result<()> {
    if !generics.params.is_empty() {
        return Err(syn::Error::new(
            generics.span(),
            format!("entity `{ident}` cannot be generic"),
        ));
    }
    if let Fields::Unnamed(unnamed) = fields {
        return Err(syn::Error::new(
            unnamed.span(),
            format!("entity `{ident}` must use named fields"),
        ));
    }
    Ok(())
}

/// Calls `f` for every nested key of every `#[entity(...)]` attribute.
fn parse_entity_meta<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown entity attribute `{key}`; expected {allowed}"))
}

fn set_constructor(
    meta: &ParseNestedMeta,
    out: &mut EntityAttrs,
    seen: &mut bool,
    constructor: Constructor,
) -> syn::Result<()> {
    if std::mem::replace(seen, true) {
        return Err(meta.error(
            "only one of `constructor`, `try_constructor` and `no_constructor` may be given",
        ));
    }
    out.constructor = constructor;
    Ok(())
}

fn parse_crate_path(meta: &ParseNestedMeta) -> syn::Result<syn::Path> {
    let lit = lit_str(meta, "crate")?;
    syn::parse_str(&lit.value()).map_err(|err| syn::Error::new(lit.span(), err))
}

/// Parses struct-level `#[entity(...)]` keys.
///
/// # Errors
///
/// Fails for unknown keys, conflicting constructor keys, and a constructor
/// declared on an abstract entity.
pub fn parse_entity_attrs(attrs: &[Attribute]) -> syn::Result<EntityAttrs> {
    let mut out = EntityAttrs::default();
    let mut constructor_seen = false;
    parse_entity_meta(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("abstract") => out.is_abstract = true,
            Some("generate_builder") => out.generate_builder = true,
            Some("constructor") => {
                let path = meta.value()?.parse::<syn::Path>()?;
                set_constructor(meta, &mut out, &mut constructor_seen, Constructor::Infallible(path))?;
            }
            Some("try_constructor") => {
                let path = meta.value()?.parse::<syn::Path>()?;
                set_constructor(meta, &mut out, &mut constructor_seen, Constructor::Fallible(path))?;
            }
            Some("no_constructor") => {
                set_constructor(meta, &mut out, &mut constructor_seen, Constructor::Missing)?;
            }
            Some("crate") => out.crate_path = Some(parse_crate_path(meta)?),
            _ => {
                return Err(unknown_key(
                    meta,
                    "`abstract`, `generate_builder`, `constructor`, `try_constructor`, \
                     `no_constructor` or `crate`",
                ));
            }
        }
        Ok(())
    })?;
    if out.is_abstract && constructor_seen {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "abstract entities cannot declare a constructor",
        ));
    }
    Ok(out)
}

/// Parses field-level `#[entity(...)]` keys.
///
/// # Errors
///
/// Fails for unknown keys.
pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_entity_meta(attrs, |meta| {
        if meta.path.is_ident("base") {
            out.base = true;
        } else if meta.path.is_ident("skip") {
            out.skip = true;
        } else {
            return Err(unknown_key(meta, "`base` or `skip`"));
        }
        Ok(())
    })?;
    Ok(out)
}

/// Parses `#[entity(...)]` keys on an enum.
///
/// # Errors
///
/// Fails for unknown keys.
pub fn parse_enum_attrs(attrs: &[Attribute]) -> syn::Result<EnumAttrs> {
    let mut out = EnumAttrs::default();
    parse_entity_meta(attrs, |meta| {
        if meta.path.is_ident("crate") {
            out.crate_path = Some(parse_crate_path(meta)?);
        } else if meta.path.is_ident("generate_builder") {
            out.generate_builder = true;
        } else {
            return Err(unknown_key(meta, "`crate`"));
        }
        Ok(())
    })?;
    Ok(out)
}

/// Reports whether any `#[entity(...)]` attribute carries `generate_builder`.
///
/// Other keys are skipped without validation, so the marker can be detected
/// on items whose attributes are otherwise malformed.
#[must_use]
pub fn is_marked(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(ATTRIBUTE))
        .any(|attr| {
            let mut marked = false;
            let scan = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("generate_builder") {
                    marked = true;
                }
                literals::discard_value(&meta)
            });
            match scan {
                Ok(()) | Err(_) => marked,
            }
        })
}

/// Reports whether `attrs` include `#[derive(..., Entity, ...)]`.
#[must_use]
pub fn derives_entity(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
            .ok()
        })
        .flatten()
        .any(|path| path.segments.last().is_some_and(|last| last.ident == "Entity"))
}
