//! Runtime half of the `entity_builder` fixture framework.
//!
//! [`EntityBuilder`] instantiates any type implementing [`Entity`], fills every
//! resolvable field with a deterministic, obviously fake default and then
//! applies caller supplied overrides after checking that each value fits the
//! field it targets. The companion `entity_builder_macros` crate derives the
//! field tables this crate walks, and `entity_builder_codegen` emits typed
//! `<Target>Builder` wrappers that forward to [`EntityBuilder`].
//!
//! ```rust
//! use entity_builder::{Entity, EntityBuilder};
//!
//! #[derive(Debug, Clone, Default, Entity)]
//! struct Person {
//!     first_name: String,
//!     age: i32,
//!     active: bool,
//! }
//!
//! # fn main() -> Result<(), entity_builder::EntityBuilderError> {
//! let person = EntityBuilder::<Person>::of()?.with("age", 25)?.build()?;
//! assert_eq!(person.first_name, "test_first_name");
//! assert_eq!(person.age, 25);
//! assert!(!person.active);
//! # Ok(())
//! # }
//! ```

extern crate self as entity_builder;

pub use entity_builder_macros::{Entity, EntityEnum};

mod builder;
mod clock;
pub mod compat;
pub mod defaults;
mod diagnostics;
mod entity;
mod error;
mod field_type;
pub mod resolver;
mod typed;
mod value;

pub use builder::{BuilderId, EntityBuilder};
pub use clock::Clock;
pub use diagnostics::{Diagnostic, DiagnosticEvent, DiagnosticSink, TracingSink};
pub use entity::{Entity, EntityEnum, EntityType, FieldDescriptor};
pub use error::{AssignError, ConstructError, EntityBuilderError, FieldAccessReason};
pub use field_type::{FieldType, FieldValue, Numeric, TypeKind};
pub use typed::{BuilderDelegate, HasBuilder, builder};
pub use value::{IntoValue, ObjectValue, Value, ValueType};

#[doc(hidden)]
pub mod __private {
    //! Re-exports used by derive output. Not part of the public API.

    pub use std::sync::OnceLock;

    pub use crate::field_type::{mismatch, object_from_value};
}
