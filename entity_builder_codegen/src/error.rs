//! Error types for the builder generator.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures that stop a generation pass.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The crate has no entry file to scan.
    #[error("crate entry file {path} not found; expected src/lib.rs or src/main.rs")]
    MissingEntry {
        /// Path that was tried.
        path: Utf8PathBuf,
    },

    /// A required build-script variable is absent or not UTF-8.
    #[error("build-script environment variable {name} is not set: {source}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
        /// Lookup failure.
        #[source]
        source: std::env::VarError,
    },

    /// Reading the entry file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// One or more marked items could not be generated.
    #[error("builder generation failed for {} item(s); first: {}", .errors.len(), first_message(.errors))]
    Failed {
        /// Every per-item failure of the pass.
        errors: Vec<GenerationError>,
    },
}

fn first_message(errors: &[GenerationError]) -> String {
    errors
        .first()
        .map_or_else(String::new, ToString::to_string)
}

/// A failure confined to one marked item or one source file.
///
/// The generator records these in its report and carries on with the rest of
/// the batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// The marker sits on something other than a struct.
    #[error("{item}: only structs can be marked with #[entity(generate_builder)]")]
    NotAStruct {
        /// Path of the marked item.
        item: String,
    },

    /// The marked struct is abstract.
    #[error("{entity}: abstract entities cannot have a generated builder")]
    AbstractTarget {
        /// Path of the entity.
        entity: String,
    },

    /// The marked struct is generic or a tuple struct.
    #[error("{entity}: {message}")]
    UnsupportedShape {
        /// Path of the entity.
        entity: String,
        /// What is unsupported.
        message: String,
    },

    /// The marked struct, or one of its ancestors, does not derive `Entity`.
    #[error("{entity}: missing #[derive(Entity)]")]
    MissingDerive {
        /// Path of the struct.
        entity: String,
    },

    /// An `#[entity]` attribute in the hierarchy is malformed.
    #[error("{entity}: invalid #[entity] attribute: {message}")]
    InvalidAttribute {
        /// Path of the struct carrying the attribute.
        entity: String,
        /// Parser message.
        message: String,
    },

    /// A `base` field names a type that is not a struct in this crate.
    #[error("{entity}: base type `{base}` does not resolve to a struct in this crate")]
    UnresolvedBase {
        /// Path of the struct declaring the base.
        entity: String,
        /// The base type as written.
        base: String,
    },

    /// The base chain revisits a struct.
    #[error("{entity}: base chain loops back to {repeated}")]
    CyclicBase {
        /// Path of the marked entity.
        entity: String,
        /// Path of the revisited struct.
        repeated: String,
    },

    /// Two ancestors bring the same type name in from different places.
    #[error("{entity}: inherited field type `{name}` resolves to both `{first}` and `{second}`")]
    ImportConflict {
        /// Path of the marked entity.
        entity: String,
        /// Conflicting name.
        name: String,
        /// First resolution.
        first: String,
        /// Second resolution.
        second: String,
    },

    /// The unit could not be rendered as Rust source.
    #[error("{entity}: failed to render builder: {message}")]
    Render {
        /// Path of the marked entity.
        entity: String,
        /// Renderer message.
        message: String,
    },

    /// Writing the unit failed.
    #[error("{entity}: I/O error at {path}: {source}")]
    Io {
        /// Path of the marked entity.
        entity: String,
        /// Location being written.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A module file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadSource {
        /// Module file.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A module file is not valid Rust.
    #[error("failed to parse {path}: {message}")]
    ParseSource {
        /// Module file.
        path: Utf8PathBuf,
        /// Parser message.
        message: String,
    },

    /// A `mod` declaration has no file on disk.
    #[error("module `{module}` declared in {declared_in} has no source file")]
    ModuleNotFound {
        /// Module path.
        module: String,
        /// File holding the declaration.
        declared_in: Utf8PathBuf,
    },
}
