//! Throwaway crate layouts for exercising the builder generator.
//!
//! # Examples
//!
//! ```
//! use test_helpers::source_tree::SourceTree;
//!
//! let tree = SourceTree::new()
//!     .expect("create temp dir")
//!     .file("src/lib.rs", "pub mod models;")
//!     .expect("write lib.rs")
//!     .file("src/models.rs", "pub struct Person;")
//!     .expect("write models.rs");
//! assert!(tree.path("src/models.rs").is_file());
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a crate's sources and an output directory.
///
/// The directory is removed when the tree is dropped.
#[derive(Debug)]
pub struct SourceTree {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl SourceTree {
    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// Fails when the temporary directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary source tree")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("temporary path is not UTF-8: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Writes `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when the file or its parents cannot be written.
    pub fn file(self, relative: &str, contents: &str) -> Result<Self> {
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {parent}"))?;
        }
        std::fs::write(&target, contents).with_context(|| format!("write {target}"))?;
        Ok(self)
    }

    /// Root of the tree, standing in for `CARGO_MANIFEST_DIR`.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory standing in for `OUT_DIR`.
    #[must_use]
    pub fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("target").join("out")
    }

    /// Absolute path of `relative` inside the tree.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Reads a file from the tree.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        let target = self.root.join(relative);
        std::fs::read_to_string(&target).with_context(|| format!("read {target}"))
    }
}
