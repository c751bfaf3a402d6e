//! Path fix-ups for field types copied into a generated unit.
//!
//! A unit is included into the target's module and wraps the builder in a
//! child module that glob-imports its parent. Types of the target's own
//! fields therefore resolve as written. Types of inherited fields were
//! written in the ancestor's module and may name items that module imports
//! or declares, so the unit imports those names explicitly.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use syn::visit::Visit;
use syn::visit_mut::VisitMut;
use syn::Type;

use crate::error::GenerationError;
use crate::hierarchy::ResolvedField;
use crate::index::{CrateIndex, parent};

/// An explicit `use` emitted into a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Import {
    /// Path segments; `crate` first for local items.
    pub path: Vec<String>,
}

impl Import {
    /// Renders the import target, anchoring external paths at `::`.
    pub fn to_path(&self) -> Option<syn::Path> {
        let joined = self.path.join("::");
        let text = if self.path.first().is_some_and(|first| first == "crate") {
            joined
        } else {
            format!("::{joined}")
        };
        syn::parse_str(&text).ok()
    }
}

/// Rewrites `self::` and `super::` prefixes in `ty` as `crate::` paths, using
/// `module` as the place the type was written.
pub(crate) fn rebase(ty: &Type, module: &[String]) -> Type {
    let mut rebased = ty.clone();
    Rebase { module }.visit_type_mut(&mut rebased);
    rebased
}

struct Rebase<'a> {
    module: &'a [String],
}

impl VisitMut for Rebase<'_> {
    fn visit_path_mut(&mut self, path: &mut syn::Path) {
        syn::visit_mut::visit_path_mut(self, path);
        if path.leading_colon.is_some() {
            return;
        }
        let mut base = self.module.to_vec();
        let mut consumed = 0;
        for segment in &path.segments {
            if segment.ident == "super" {
                if base.pop().is_none() {
                    return;
                }
            } else if segment.ident != "self" {
                break;
            }
            consumed += 1;
        }
        if consumed == 0 {
            return;
        }
        let prefix = std::iter::once("crate")
            .chain(base.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("::");
        let Ok(mut absolute) = syn::parse_str::<syn::Path>(&prefix) else {
            return;
        };
        absolute
            .segments
            .extend(path.segments.iter().skip(consumed).cloned());
        *path = absolute;
    }
}

/// Works out the imports a unit for a target in `target_module` needs.
///
/// # Errors
///
/// Returns [`GenerationError::ImportConflict`] when one name would have to
/// refer to two different items.
pub(crate) fn collect(
    index: &CrateIndex<'_>,
    target_module: &[String],
    fields: &[ResolvedField],
    entity: &str,
) -> Result<Vec<Import>, GenerationError> {
    let mut chosen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for resolved in fields
        .iter()
        .filter(|resolved| resolved.owner != target_module)
    {
        for name in root_names(&resolved.field.ty) {
            let Some(path) = resolve_root(index, &resolved.owner, &name) else {
                continue;
            };
            if let Some(local) = resolve_root(index, target_module, &name) {
                if local == path {
                    continue;
                }
                return Err(conflict(entity, &name, &local, &path));
            }
            match chosen.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(path);
                }
                Entry::Occupied(existing) if *existing.get() != path => {
                    return Err(conflict(entity, existing.key(), existing.get(), &path));
                }
                Entry::Occupied(_) => {}
            }
        }
    }
    Ok(chosen.into_values().map(|path| Import { path }).collect())
}

fn conflict(entity: &str, name: &str, first: &[String], second: &[String]) -> GenerationError {
    GenerationError::ImportConflict {
        entity: entity.to_owned(),
        name: name.to_owned(),
        first: first.join("::"),
        second: second.join("::"),
    }
}

/// Maps `name`, as seen from `module`, to the path of the item it denotes.
fn resolve_root(index: &CrateIndex<'_>, module: &[String], name: &str) -> Option<Vec<String>> {
    if index.declares(module, name) {
        return Some(
            std::iter::once("crate".to_owned())
                .chain(module.iter().cloned())
                .chain(std::iter::once(name.to_owned()))
                .collect(),
        );
    }
    let target = index.uses_of(module)?.get(name)?;
    absolute_use(index, module, target)
}

fn absolute_use(index: &CrateIndex<'_>, module: &[String], segments: &[String]) -> Option<Vec<String>> {
    let (first, rest) = segments.split_first()?;
    let mut base = match first.as_str() {
        "crate" => Vec::new(),
        "self" => module.to_vec(),
        "super" => parent(module)?,
        other if index.declares(module, other) => {
            let mut local = module.to_vec();
            local.push(other.to_owned());
            local
        }
        _ => return Some(segments.to_vec()),
    };
    for segment in rest {
        if segment == "super" {
            base = parent(&base)?;
        } else if segment != "self" {
            base.push(segment.clone());
        }
    }
    Some(std::iter::once("crate".to_owned()).chain(base).collect())
}

/// First identifiers of the relative paths inside `ty`.
fn root_names(ty: &Type) -> Vec<String> {
    let mut roots = Roots(Vec::new());
    roots.visit_type(ty);
    roots.0
}

struct Roots(Vec<String>);

impl<'ast> Visit<'ast> for Roots {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        if path.leading_colon.is_none()
            && let Some(first) = path.segments.first()
        {
            let name = first.ident.to_string();
            let relative = !matches!(name.as_str(), "crate" | "self" | "super" | "Self");
            if relative && !self.0.contains(&name) {
                self.0.push(name);
            }
        }
        syn::visit::visit_path(self, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityField;
    use crate::scan::ModuleSource;
    use camino::Utf8PathBuf;
    use quote::ToTokens;
    use rstest::rstest;
    use syn::{Item, parse_quote};

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|segment| (*segment).to_owned()).collect()
    }

    fn module(path: &[&str], items: Vec<Item>) -> ModuleSource {
        ModuleSource {
            path: segments(path),
            file: Utf8PathBuf::from("src/lib.rs"),
            items,
        }
    }

    fn field(name: &str, ty: Type, owner: &[&str]) -> ResolvedField {
        ResolvedField {
            field: EntityField {
                ident: syn::Ident::new(name, proc_macro2::Span::call_site()),
                ty,
            },
            owner: segments(owner),
        }
    }

    fn tree() -> Vec<ModuleSource> {
        vec![
            module(&[], vec![parse_quote! { mod common; }, parse_quote! { mod catalog; }]),
            module(
                &["common"],
                vec![
                    parse_quote! { use chrono::NaiveDateTime; },
                    parse_quote! { use super::shared::Money; },
                    parse_quote! { pub enum Status { Active } },
                    parse_quote! { pub mod tags { pub struct Tag; } },
                ],
            ),
            module(&["common", "tags"], vec![parse_quote! { pub struct Tag; }]),
            module(
                &["catalog"],
                vec![
                    parse_quote! { use crate::common::Status; },
                    parse_quote! { pub struct Money; },
                ],
            ),
        ]
    }

    #[rstest]
    #[case::self_prefix(parse_quote!(self::Money), &["catalog"], "crate :: catalog :: Money")]
    #[case::super_prefix(parse_quote!(Vec<super::common::Status>), &["catalog"], "Vec < crate :: common :: Status >")]
    #[case::nested_super(parse_quote!(super::super::Root), &["a", "b"], "crate :: Root")]
    #[case::untouched(parse_quote!(Option<String>), &["a"], "Option < String >")]
    fn rebases_relative_prefixes(#[case] ty: Type, #[case] module: &[&str], #[case] expected: &str) {
        let rebased = rebase(&ty, &segments(module));
        assert_eq!(rebased.to_token_stream().to_string(), expected);
    }

    #[rstest]
    fn imports_names_from_ancestor_modules() {
        let modules = tree();
        let index = CrateIndex::new(&modules);
        let fields = vec![
            field("name", parse_quote!(String), &["catalog"]),
            field("created_at", parse_quote!(NaiveDateTime), &["common"]),
            field("status", parse_quote!(Option<Status>), &["common"]),
            field("tags", parse_quote!(Vec<tags::Tag>), &["common"]),
            field("label", parse_quote!(String), &["common"]),
        ];
        let imports = collect(&index, &segments(&["catalog"]), &fields, "crate::catalog::Product")
            .expect("imports resolve");
        let rendered: Vec<String> = imports
            .iter()
            .filter_map(Import::to_path)
            .map(|path| path.to_token_stream().to_string())
            .collect();
        assert_eq!(
            rendered,
            vec![":: chrono :: NaiveDateTime", "crate :: common :: tags"]
        );
    }

    #[rstest]
    fn conflicting_names_are_reported() {
        let modules = tree();
        let index = CrateIndex::new(&modules);
        let fields = vec![field("price", parse_quote!(Money), &["common"])];
        let Err(err) = collect(&index, &segments(&["catalog"]), &fields, "crate::catalog::Product") else {
            panic!("conflict expected");
        };
        assert!(
            matches!(&err, GenerationError::ImportConflict { name, .. } if name == "Money"),
            "{err}"
        );
    }
}
