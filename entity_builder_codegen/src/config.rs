//! Generator configuration.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::CodegenError;

/// Directory under `OUT_DIR` that receives generated units.
pub const UNITS_DIR: &str = "entity_builders";

/// Runtime crate path used when an entity does not override it.
pub const DEFAULT_RUNTIME_CRATE: &str = "::entity_builder";

/// Where the generator reads sources and writes builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root of the crate being scanned.
    pub manifest_dir: Utf8PathBuf,
    /// Directory receiving `<module path>/<Target>Builder.rs` units.
    pub out_dir: Utf8PathBuf,
    /// Crate entry file the module walk starts from.
    pub entry: Utf8PathBuf,
    /// Path of the runtime crate in generated code.
    pub runtime_crate: String,
}

impl GeneratorConfig {
    /// Configures a pass over the crate at `manifest_dir`, writing under
    /// `out_root/entity_builders`.
    ///
    /// The entry is `src/lib.rs` when present, else `src/main.rs`.
    #[must_use]
    pub fn new(manifest_dir: impl Into<Utf8PathBuf>, out_root: &Utf8Path) -> Self {
        let manifest = manifest_dir.into();
        let lib = manifest.join("src").join("lib.rs");
        let entry = if lib.is_file() {
            lib
        } else {
            manifest.join("src").join("main.rs")
        };
        Self {
            manifest_dir: manifest,
            out_dir: out_root.join(UNITS_DIR),
            entry,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_owned(),
        }
    }

    /// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR` from the build-script
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::MissingEnv`] when either variable is unset.
    pub fn from_env() -> Result<Self, CodegenError> {
        let manifest = env_path("CARGO_MANIFEST_DIR")?;
        let out = env_path("OUT_DIR")?;
        Ok(Self::new(manifest, &out))
    }

    /// Scans `entry` instead of the detected crate root.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<Utf8PathBuf>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Refers to the runtime crate as `path` in generated code.
    #[must_use]
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }
}

fn env_path(name: &'static str) -> Result<Utf8PathBuf, CodegenError> {
    std::env::var(name)
        .map(Utf8PathBuf::from)
        .map_err(|source| CodegenError::MissingEnv { name, source })
}
