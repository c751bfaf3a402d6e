//! A flat entity with a generated builder.

use entity_builder::Entity;

/// Someone in the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
#[entity(generate_builder)]
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Age in years.
    pub age: i32,
    /// Whether the account is enabled.
    pub active: bool,
    /// Free-form labels.
    pub tags: Vec<String>,
}

entity_builder::include_builder!(PersonBuilder in person);
