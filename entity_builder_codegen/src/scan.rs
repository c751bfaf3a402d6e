//! Walks a crate's module tree from its entry file.
//!
//! File modules (`foo.rs`, `foo/mod.rs`), `#[path]` overrides and inline
//! modules are followed. Modules gated behind `#[cfg(test)]` are skipped.
//! Unreadable or unparsable files become per-file errors; only a missing
//! entry file stops the walk.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use syn::{Attribute, Item, ItemMod};

use crate::error::{CodegenError, GenerationError};

/// A module and the items declared directly in it.
pub(crate) struct ModuleSource {
    /// Segments from the crate root; empty for the root itself.
    pub path: Vec<String>,
    /// File holding the items.
    pub file: Utf8PathBuf,
    /// Items declared in the module body.
    pub items: Vec<Item>,
}

impl ModuleSource {
    /// `crate::a::b` style rendering of the module path.
    pub fn display_path(&self) -> String {
        display_module(&self.path)
    }
}

/// Renders module segments as a `crate::...` path.
pub(crate) fn display_module(path: &[String]) -> String {
    std::iter::once("crate")
        .chain(path.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("::")
}

/// Everything the walk found.
pub(crate) struct CrateSources {
    /// Modules in discovery order, root first.
    pub modules: Vec<ModuleSource>,
    /// Every file read, for `rerun-if-changed`.
    pub files: Vec<Utf8PathBuf>,
    /// Per-file failures.
    pub errors: Vec<GenerationError>,
}

struct Pending {
    path: Vec<String>,
    file: Utf8PathBuf,
    items: Vec<Item>,
    child_dir: Utf8PathBuf,
    inline: bool,
}

/// Scans the crate rooted at `entry`.
pub(crate) fn scan_crate(entry: &Utf8Path) -> Result<CrateSources, CodegenError> {
    let mut sources = CrateSources {
        modules: Vec::new(),
        files: Vec::new(),
        errors: Vec::new(),
    };
    let text = match read_source(entry) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CodegenError::MissingEntry {
                path: entry.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(CodegenError::Io {
                path: entry.to_path_buf(),
                source: err,
            });
        }
    };
    sources.files.push(entry.to_path_buf());
    let Some(items) = parse_items(entry, &text, &mut sources.errors) else {
        return Ok(sources);
    };
    let mut queue = vec![Pending {
        path: Vec::new(),
        file: entry.to_path_buf(),
        items,
        child_dir: parent_dir(entry),
        inline: false,
    }];
    while let Some(pending) = queue.pop() {
        for item in &pending.items {
            let Item::Mod(module) = item else {
                continue;
            };
            if is_test_only(&module.attrs) {
                continue;
            }
            if let Some(child) = load_child(&pending, module, &mut sources) {
                queue.push(child);
            }
        }
        sources.modules.push(ModuleSource {
            path: pending.path,
            file: pending.file,
            items: pending.items,
        });
    }
    sources.modules.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

fn load_child(
    parent: &Pending,
    module: &ItemMod,
    sources: &mut CrateSources,
) -> Option<Pending> {
    let name = module.ident.to_string();
    let mut path = parent.path.clone();
    path.push(name.clone());

    if let Some((_, items)) = &module.content {
        return Some(Pending {
            path,
            file: parent.file.clone(),
            items: items.clone(),
            child_dir: parent.child_dir.join(&name),
            inline: true,
        });
    }

    let candidates = path_override(&module.attrs).map_or_else(
        || {
            vec![
                parent.child_dir.join(format!("{name}.rs")),
                parent.child_dir.join(&name).join("mod.rs"),
            ]
        },
        |custom| {
            // Inside an inline module the path is relative to that module's
            // directory, otherwise to the declaring file's directory.
            let base = if parent.inline {
                parent.child_dir.clone()
            } else {
                parent_dir(&parent.file)
            };
            vec![base.join(custom)]
        },
    );
    let Some(file) = candidates.into_iter().find(|candidate| candidate.is_file()) else {
        sources.errors.push(GenerationError::ModuleNotFound {
            module: display_module(&path),
            declared_in: parent.file.clone(),
        });
        return None;
    };

    let text = match read_source(&file) {
        Ok(text) => text,
        Err(source) => {
            sources.errors.push(GenerationError::ReadSource { path: file, source });
            return None;
        }
    };
    sources.files.push(file.clone());
    let items = parse_items(&file, &text, &mut sources.errors)?;
    let child_dir = if file.file_name() == Some("mod.rs") {
        parent_dir(&file)
    } else {
        parent_dir(&file).join(&name)
    };
    Some(Pending {
        path,
        file,
        items,
        child_dir,
        inline: false,
    })
}

fn parse_items(
    file: &Utf8Path,
    text: &str,
    errors: &mut Vec<GenerationError>,
) -> Option<Vec<Item>> {
    match syn::parse_file(text) {
        Ok(parsed) => Some(parsed.items),
        Err(err) => {
            errors.push(GenerationError::ParseSource {
                path: file.to_path_buf(),
                message: err.to_string(),
            });
            None
        }
    }
}

fn read_source(file: &Utf8Path) -> std::io::Result<String> {
    let dir = Dir::open_ambient_dir(parent_dir(file), ambient_authority())?;
    let name = file
        .file_name()
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))?;
    dir.read_to_string(name)
}

fn parent_dir(file: &Utf8Path) -> Utf8PathBuf {
    file.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf)
}

fn path_override(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("path"))
        .find_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value()),
            _ => None,
        })
}

fn is_test_only(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}
