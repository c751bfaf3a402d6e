//! Flattens an entity's own and inherited fields.
//!
//! Fields of the target come first in declaration order, followed by each
//! ancestor nearest-first. A name already seen closer to the target shadows
//! the same name further up the chain, so every name appears once.

use std::any::TypeId;
use std::collections::HashSet;

use crate::entity::{EntityType, FieldDescriptor};

/// Walks the chain from `ty` to its root ancestor.
///
/// The walk stops before revisiting a type, so a cyclic chain still
/// terminates; [`find_cycle`] reports such chains.
pub fn ancestry(ty: &'static EntityType) -> impl Iterator<Item = &'static EntityType> {
    let mut seen = HashSet::<TypeId>::new();
    std::iter::successors(Some(ty), |current| current.parent())
        .take_while(move |current| seen.insert(current.type_id()))
}

/// Returns the first type that appears twice in the ancestor chain of `ty`.
#[must_use]
pub fn find_cycle(ty: &'static EntityType) -> Option<&'static EntityType> {
    let mut seen = HashSet::<TypeId>::new();
    std::iter::successors(Some(ty), |current| current.parent())
        .find(|current| !seen.insert(current.type_id()))
}

/// Resolves the flattened, name-unique field list of `ty`.
///
/// Never fails: an entity without eligible fields resolves to an empty list.
#[must_use]
pub fn resolve_fields(ty: &'static EntityType) -> Vec<FieldDescriptor> {
    let mut names = HashSet::new();
    ancestry(ty)
        .flat_map(EntityType::own_fields)
        .filter(|field| names.insert(field.name()))
        .copied()
        .collect()
}
