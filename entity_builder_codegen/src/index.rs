//! Name resolution over the scanned module tree.
//!
//! Resolution is deliberately shallow: it understands `crate::`, `self::`
//! and `super::` prefixes, each module's `use` declarations and the items a
//! module declares. Glob imports are not followed. A bare name that matches
//! none of these falls back to the unique struct of that name in the crate.

use std::collections::HashMap;

use syn::{Item, ItemStruct, UseTree};

use crate::scan::ModuleSource;

/// A struct found in the crate.
#[derive(Clone, Copy)]
pub(crate) struct StructRef<'a> {
    /// Module declaring the struct.
    pub module: &'a ModuleSource,
    /// The struct item.
    pub item: &'a ItemStruct,
}

impl StructRef<'_> {
    /// `crate::a::Name` rendering used in messages.
    pub fn display_path(&self) -> String {
        format!("{}::{}", self.module.display_path(), self.item.ident)
    }

    /// Identity of the struct within the crate.
    pub fn key(&self) -> (Vec<String>, String) {
        (self.module.path.clone(), self.item.ident.to_string())
    }
}

/// Lookup tables over every scanned module.
pub(crate) struct CrateIndex<'a> {
    modules: HashMap<Vec<String>, &'a ModuleSource>,
    structs: HashMap<(Vec<String>, String), &'a ItemStruct>,
    uses: HashMap<Vec<String>, HashMap<String, Vec<String>>>,
}

impl<'a> CrateIndex<'a> {
    /// Indexes `modules`.
    pub fn new(modules: &'a [ModuleSource]) -> Self {
        let mut index = Self {
            modules: HashMap::new(),
            structs: HashMap::new(),
            uses: HashMap::new(),
        };
        for module in modules {
            index.modules.insert(module.path.clone(), module);
            let mut uses = HashMap::new();
            for item in &module.items {
                match item {
                    Item::Struct(item_struct) => {
                        index.structs.insert(
                            (module.path.clone(), item_struct.ident.to_string()),
                            item_struct,
                        );
                    }
                    Item::Use(item_use) => collect_use(&item_use.tree, &[], &mut uses),
                    _ => {}
                }
            }
            index.uses.insert(module.path.clone(), uses);
        }
        index
    }

    /// The module at `path`, if it was scanned.
    pub fn module(&self, path: &[String]) -> Option<&'a ModuleSource> {
        self.modules.get(path).copied()
    }

    /// The `use` declarations of `module`, keyed by the name they bind.
    pub fn uses_of(&self, module: &[String]) -> Option<&HashMap<String, Vec<String>>> {
        self.uses.get(module)
    }

    /// Reports whether `module` declares a nameable item called `name`.
    pub fn declares(&self, module: &[String], name: &str) -> bool {
        self.module(module).is_some_and(|source| {
            source
                .items
                .iter()
                .filter_map(item_ident)
                .any(|ident| ident == name)
        })
    }

    /// Resolves a type path written in `from` to a struct in this crate.
    pub fn resolve_struct(&self, from: &[String], path: &syn::Path) -> Option<StructRef<'a>> {
        if path.leading_colon.is_some() {
            return None;
        }
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        let (name, prefix) = segments.split_last()?;
        if prefix.is_empty() {
            return self
                .lookup(from, name)
                .or_else(|| {
                    let target = self.uses_of(from)?.get(name)?;
                    self.absolute(from, target)
                })
                .or_else(|| self.unique_by_name(name));
        }
        self.absolute(from, &segments)
    }

    /// Resolves a multi-segment path relative to `from` into a struct.
    fn absolute(&self, from: &[String], segments: &[String]) -> Option<StructRef<'a>> {
        let module = self.module_prefix(from, segments)?;
        let (name, _) = segments.split_last()?;
        self.lookup(&module, name)
    }

    /// Maps the module part of `segments`, as written in `from`, to an
    /// absolute module path.
    pub fn module_prefix(&self, from: &[String], segments: &[String]) -> Option<Vec<String>> {
        let (_, prefix) = segments.split_last()?;
        let Some((first, rest)) = prefix.split_first() else {
            return Some(from.to_vec());
        };
        let mut base = match first.as_str() {
            "crate" => Vec::new(),
            "self" => from.to_vec(),
            "super" => parent(from)?,
            other => {
                if let Some(target) = self.uses_of(from).and_then(|uses| uses.get(other)) {
                    let mut expanded = target.clone();
                    expanded.extend(rest.iter().cloned());
                    expanded.push(String::new());
                    return self.module_prefix(from, &expanded);
                }
                let mut local = from.to_vec();
                local.push(other.to_owned());
                if self.modules.contains_key(&local) {
                    local
                } else {
                    vec![other.to_owned()]
                }
            }
        };
        for segment in rest {
            if segment == "super" {
                base = parent(&base)?;
            } else if segment != "self" {
                base.push(segment.clone());
            }
        }
        self.modules.contains_key(&base).then_some(base)
    }

    fn lookup(&self, module: &[String], name: &str) -> Option<StructRef<'a>> {
        let item = self.structs.get(&(module.to_vec(), name.to_owned()))?;
        let source = self.module(module)?;
        Some(StructRef {
            module: source,
            item,
        })
    }

    fn unique_by_name(&self, name: &str) -> Option<StructRef<'a>> {
        let mut matches = self
            .structs
            .iter()
            .filter(|((_, candidate), _)| candidate == name);
        let ((module, _), _) = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        self.lookup(module, name)
    }
}

fn item_ident(item: &Item) -> Option<&syn::Ident> {
    match item {
        Item::Struct(inner) => Some(&inner.ident),
        Item::Enum(inner) => Some(&inner.ident),
        Item::Type(inner) => Some(&inner.ident),
        Item::Union(inner) => Some(&inner.ident),
        Item::Trait(inner) => Some(&inner.ident),
        Item::Mod(inner) => Some(&inner.ident),
        _ => None,
    }
}

pub(crate) fn parent(path: &[String]) -> Option<Vec<String>> {
    let (_, rest) = path.split_last()?;
    Some(rest.to_vec())
}

/// Records the names a `use` tree binds, mapped to the path it names.
fn collect_use(tree: &UseTree, prefix: &[String], out: &mut HashMap<String, Vec<String>>) {
    match tree {
        UseTree::Path(path) => {
            let mut next = prefix.to_vec();
            next.push(path.ident.to_string());
            collect_use(&path.tree, &next, out);
        }
        UseTree::Name(name) => {
            let mut full = prefix.to_vec();
            if name.ident == "self" {
                if let Some(last) = prefix.last() {
                    out.insert(last.clone(), full);
                }
                return;
            }
            full.push(name.ident.to_string());
            out.insert(name.ident.to_string(), full);
        }
        UseTree::Rename(rename) => {
            let mut full = prefix.to_vec();
            if rename.ident != "self" {
                full.push(rename.ident.to_string());
            }
            out.insert(rename.rename.to_string(), full);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use(item, prefix, out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use syn::parse_quote;

    fn module(path: &[&str], items: Vec<Item>) -> ModuleSource {
        ModuleSource {
            path: path.iter().map(|segment| (*segment).to_owned()).collect(),
            file: Utf8PathBuf::from("src/lib.rs"),
            items,
        }
    }

    fn tree() -> Vec<ModuleSource> {
        vec![
            module(
                &[],
                vec![
                    parse_quote! { mod common; },
                    parse_quote! { mod catalog; },
                    parse_quote! { struct Root { id: i64 } },
                ],
            ),
            module(
                &["common"],
                vec![
                    parse_quote! { struct BaseEntity { id: i64 } },
                    parse_quote! { struct Audit { at: i64 } },
                ],
            ),
            module(
                &["catalog"],
                vec![
                    parse_quote! { use crate::common::{self, BaseEntity as Base}; },
                    parse_quote! { use super::common::Audit; },
                    parse_quote! { mod items { } },
                    parse_quote! { struct Product { #[entity(base)] base: Base } },
                ],
            ),
            module(&["catalog", "items"], vec![parse_quote! { struct Item { n: i32 } }]),
        ]
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|segment| (*segment).to_owned()).collect()
    }

    #[rstest]
    #[case::renamed_use(&["catalog"], "Base", Some("crate::common::BaseEntity"))]
    #[case::super_use(&["catalog"], "Audit", Some("crate::common::Audit"))]
    #[case::module_alias(&["catalog"], "common::Audit", Some("crate::common::Audit"))]
    #[case::crate_absolute(&["catalog"], "crate::common::BaseEntity", Some("crate::common::BaseEntity"))]
    #[case::super_path(&["catalog", "items"], "super::Product", Some("crate::catalog::Product"))]
    #[case::child_module(&["catalog"], "items::Item", Some("crate::catalog::items::Item"))]
    #[case::local(&["common"], "Audit", Some("crate::common::Audit"))]
    #[case::unique_fallback(&["catalog", "items"], "Root", Some("crate::Root"))]
    #[case::external(&["catalog"], "chrono::NaiveDate", None)]
    #[case::leading_colon(&["catalog"], "::common::Audit", None)]
    fn resolves_struct_paths(
        #[case] from: &[&str],
        #[case] written: &str,
        #[case] expected: Option<&str>,
    ) {
        let modules = tree();
        let index = CrateIndex::new(&modules);
        let path: syn::Path = syn::parse_str(written).expect("valid path");
        let found = index
            .resolve_struct(&segments(from), &path)
            .map(|found| found.display_path());
        assert_eq!(found.as_deref(), expected);
    }

    #[rstest]
    fn duplicate_names_block_the_fallback() {
        let mut modules = tree();
        modules.push(module(&["other"], vec![parse_quote! { struct Audit { x: i8 } }]));
        let index = CrateIndex::new(&modules);
        let path: syn::Path = parse_quote!(Audit);
        assert!(index.resolve_struct(&segments(&["catalog", "items"]), &path).is_none());
    }
}
