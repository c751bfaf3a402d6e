//! Fixture crate for generated-builder integration tests.
//!
//! `build.rs` runs the builder generator over this crate, and every marked
//! entity pulls its unit in with `include_builder!`.

pub mod catalog;
pub mod common;
pub mod extended;
pub mod person;

pub use catalog::{Product, ProductBuilder, Status};
pub use common::BaseEntity;
pub use extended::{ExtendedEntity, ExtendedEntityBuilder, Priority};
pub use person::{Person, PersonBuilder};

pub mod outer {
    //! Nested targets that refer to one another.

    use entity_builder::Entity;

    /// A target declared in an inline module.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
    #[entity(generate_builder)]
    pub struct NestedEntity {
        /// Display name.
        pub name: String,
        /// Number of references.
        pub count: i32,
    }

    /// A second nested target holding the first.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Entity)]
    #[entity(generate_builder)]
    pub struct AnotherNestedEntity {
        /// Free-text note.
        pub nested_field: String,
        /// Optional link to a sibling target.
        pub reference: Option<NestedEntity>,
    }

    entity_builder::include_builder!(NestedEntityBuilder in outer);
    entity_builder::include_builder!(AnotherNestedEntityBuilder in outer);
}
