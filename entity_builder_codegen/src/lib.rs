//! Build-script generator for typed `entity_builder` builders.
//!
//! The generator walks a crate's module tree, finds every struct marked
//! `#[entity(generate_builder)]` and writes a `<Target>Builder.rs` unit for
//! it under `$OUT_DIR/entity_builders/`. Each unit defines a builder with one
//! `with_<field>` setter per resolvable field, inherited fields included,
//! forwarding to the runtime `EntityBuilder`. The crate that owns the target
//! pulls the unit in with `entity_builder::include_builder!`.
//!
//! A typical `build.rs`:
//!
//! ```no_run
//! fn main() -> Result<(), entity_builder_codegen::CodegenError> {
//!     let report = entity_builder_codegen::generate_builders()?;
//!     report.emit_cargo_directives()?;
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! Failures are collected per marked item, so one abstract or malformed
//! target does not stop the other builders from being written.

mod config;
mod emit;
mod error;
mod generator;
mod hierarchy;
mod imports;
mod index;
pub mod model;
mod report;
mod scan;
mod writer;

pub use config::{DEFAULT_RUNTIME_CRATE, GeneratorConfig, UNITS_DIR};
pub use emit::GENERATED_HEADER;
pub use error::{CodegenError, GenerationError};
pub use generator::generate;
pub use report::{GeneratedUnit, GenerationReport};

/// Runs a pass configured from the build-script environment.
///
/// # Errors
///
/// Fails when `CARGO_MANIFEST_DIR` or `OUT_DIR` is unset, or when the crate
/// entry file cannot be read. Per-item failures are returned in the report.
pub fn generate_builders() -> Result<GenerationReport, CodegenError> {
    let config = GeneratorConfig::from_env()?;
    generate(&config)
}
