//! Shared ancestor for catalog entities.

use chrono::NaiveDateTime;
use entity_builder::Entity;

/// Audit columns every stored entity carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
#[entity(abstract)]
pub struct BaseEntity {
    /// Storage identifier.
    pub id: i64,
    /// Creation instant.
    pub created_at: NaiveDateTime,
    /// Author of the record.
    pub created_by: String,
}
