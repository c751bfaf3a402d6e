//! Flattens a marked struct and its `base` chain into one field list.
//!
//! Mirrors the runtime resolver: the target's own fields come first, then
//! each ancestor nearest-first, and the first field seen for a name wins.

use std::collections::HashSet;

use quote::ToTokens;
use syn::Type;

use crate::error::GenerationError;
use crate::index::{CrateIndex, StructRef};
use crate::model::{EntityField, EntityModel, check_shape, derives_entity};

/// A field the generated builder exposes.
pub(crate) struct ResolvedField {
    /// The field as declared.
    pub field: EntityField,
    /// Module of the struct declaring the field.
    pub owner: Vec<String>,
}

/// Reads `found` as an entity, mapping failures to generation errors.
pub(crate) fn read_entity(found: StructRef<'_>) -> Result<EntityModel, GenerationError> {
    let entity = found.display_path();
    let item = found.item;
    if !derives_entity(&item.attrs) {
        return Err(GenerationError::MissingDerive { entity });
    }
    if let Err(err) = check_shape(&item.ident, &item.generics, &item.fields) {
        return Err(GenerationError::UnsupportedShape {
            entity,
            message: err.to_string(),
        });
    }
    EntityModel::from_item(item).map_err(|err| GenerationError::InvalidAttribute {
        entity,
        message: err.to_string(),
    })
}

/// Collects every field of `target`, whose model has already been read.
pub(crate) fn flatten<'a>(
    index: &CrateIndex<'a>,
    target: StructRef<'a>,
    model: &EntityModel,
) -> Result<Vec<ResolvedField>, GenerationError> {
    let mut visited = HashSet::from([target.key()]);
    let mut names = HashSet::new();
    let mut fields = Vec::new();
    let mut current = target;
    let mut current_model = model.clone();
    loop {
        for field in current_model.fields {
            if names.insert(field.name()) {
                fields.push(ResolvedField {
                    field,
                    owner: current.module.path.clone(),
                });
            }
        }
        let Some(base) = current_model.base else {
            return Ok(fields);
        };
        let next = resolve_base(index, current, &base.ty)?;
        if !visited.insert(next.key()) {
            return Err(GenerationError::CyclicBase {
                entity: target.display_path(),
                repeated: next.display_path(),
            });
        }
        current_model = read_entity(next)?;
        current = next;
    }
}

fn resolve_base<'a>(
    index: &CrateIndex<'a>,
    declared_in: StructRef<'_>,
    ty: &Type,
) -> Result<StructRef<'a>, GenerationError> {
    let unresolved = || GenerationError::UnresolvedBase {
        entity: declared_in.display_path(),
        base: ty.to_token_stream().to_string(),
    };
    let Type::Path(type_path) = ty else {
        return Err(unresolved());
    };
    if type_path.qself.is_some() {
        return Err(unresolved());
    }
    index
        .resolve_struct(&declared_in.module.path, &type_path.path)
        .ok_or_else(unresolved)
}
