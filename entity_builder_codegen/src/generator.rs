//! Drives a generation pass over a crate.

use syn::Item;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::emit::{self, UnitPlan};
use crate::error::{CodegenError, GenerationError};
use crate::hierarchy::{flatten, read_entity};
use crate::imports;
use crate::index::{CrateIndex, StructRef};
use crate::model::is_marked;
use crate::report::{GeneratedUnit, GenerationReport};
use crate::scan::scan_crate;
use crate::writer::{WriteOutcome, write_unit};

/// Generates a builder for every marked struct reachable from the entry
/// file of `config`.
///
/// Marked items are processed independently: a failure is recorded against
/// its item and the pass moves on.
///
/// # Errors
///
/// Fails only when the entry file is missing or unreadable. Everything else
/// is reported through [`GenerationReport::errors`].
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport, CodegenError> {
    info!(entry = %config.entry, out_dir = %config.out_dir, "scanning for marked entities");
    let sources = scan_crate(&config.entry)?;
    let index = CrateIndex::new(&sources.modules);
    let mut report = GenerationReport {
        units: Vec::new(),
        errors: sources.errors,
        sources: sources.files,
    };

    for module in &sources.modules {
        for item in &module.items {
            let Some(ident) = marked_item(item) else {
                continue;
            };
            let outcome = match item {
                Item::Struct(item_struct) => generate_unit(
                    config,
                    &index,
                    StructRef {
                        module,
                        item: item_struct,
                    },
                ),
                _ => Err(GenerationError::NotAStruct {
                    item: format!("{}::{ident}", module.display_path()),
                }),
            };
            match outcome {
                Ok(unit) => report.units.push(unit),
                Err(error) => {
                    warn!(%error, file = %module.file, "skipping marked item");
                    report.errors.push(error);
                }
            }
        }
    }

    report.units.sort_by(|a, b| a.target.cmp(&b.target));
    info!(
        generated = report.units.len(),
        failed = report.errors.len(),
        "builder generation finished"
    );
    Ok(report)
}

fn generate_unit<'a>(
    config: &GeneratorConfig,
    index: &CrateIndex<'a>,
    target: StructRef<'a>,
) -> Result<GeneratedUnit, GenerationError> {
    let entity = target.display_path();
    let model = read_entity(target)?;
    if model.attrs.is_abstract {
        return Err(GenerationError::AbstractTarget { entity });
    }
    let fields = flatten(index, target, &model)?;
    let imports = imports::collect(index, &target.module.path, &fields, &entity)?;
    let krate = match model.attrs.crate_path {
        Some(path) => path,
        None => syn::parse_str(&config.runtime_crate).map_err(|err| GenerationError::Render {
            entity: entity.clone(),
            message: format!("invalid runtime crate path `{}`: {err}", config.runtime_crate),
        })?,
    };

    let source = emit::render(&UnitPlan {
        target: &target.item.ident,
        vis: &target.item.vis,
        display_path: &entity,
        krate: &krate,
        fields: &fields,
        imports: &imports,
    })
    .map_err(|message| GenerationError::Render {
        entity: entity.clone(),
        message,
    })?;

    let builder = emit::builder_ident(&target.item.ident).to_string();
    let file_name = format!("{builder}.rs");
    let (path, outcome) = write_unit(&config.out_dir, &target.module.path, &file_name, &source)
        .map_err(|failure| GenerationError::Io {
            entity: entity.clone(),
            path: failure.path,
            source: failure.source,
        })?;
    debug!(
        %entity,
        source = %target.module.file,
        %path,
        fields = fields.len(),
        unchanged = outcome == WriteOutcome::Unchanged,
        "builder unit ready"
    );
    Ok(GeneratedUnit {
        target: entity,
        builder,
        path,
    })
}

/// Returns the name of `item` when it carries the marker.
fn marked_item(item: &Item) -> Option<&syn::Ident> {
    let (ident, attrs) = match item {
        Item::Struct(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Enum(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Union(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Type(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Trait(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Fn(inner) => (&inner.sig.ident, inner.attrs.as_slice()),
        Item::Const(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Static(inner) => (&inner.ident, inner.attrs.as_slice()),
        Item::Mod(inner) => (&inner.ident, inner.attrs.as_slice()),
        _ => return None,
    };
    is_marked(attrs).then_some(ident)
}
