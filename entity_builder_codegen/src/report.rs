//! Outcome of a generation pass.

use std::io::Write;

use camino::Utf8PathBuf;

use crate::error::{CodegenError, GenerationError};

/// A builder written (or confirmed up to date) by the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// `crate::a::Target` path of the entity.
    pub target: String,
    /// Name of the generated builder type.
    pub builder: String,
    /// File holding the unit.
    pub path: Utf8PathBuf,
}

/// Everything a pass produced.
///
/// Failures are collected rather than returned early so one bad item does
/// not hide the rest of the batch.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Units written, in target path order.
    pub units: Vec<GeneratedUnit>,
    /// Per-item and per-file failures.
    pub errors: Vec<GenerationError>,
    /// Every source file the scan read.
    pub sources: Vec<Utf8PathBuf>,
}

impl GenerationReport {
    /// Reports whether the pass finished without failures.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Writes Cargo build-script directives for this report.
    ///
    /// Every scanned source gets a `rerun-if-changed` line and every failure
    /// becomes a `cargo:warning`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_cargo_directives(&self, out: &mut impl Write) -> std::io::Result<()> {
        for source in &self.sources {
            writeln!(out, "cargo:rerun-if-changed={source}")?;
        }
        for error in &self.errors {
            let message = error.to_string().replace('\n', " ");
            writeln!(out, "cargo:warning=entity_builder_codegen: {message}")?;
        }
        Ok(())
    }

    /// Writes Cargo directives to standard output.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Io`] when standard output cannot be written.
    pub fn emit_cargo_directives(&self) -> Result<(), CodegenError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_cargo_directives(&mut lock)
            .and_then(|()| lock.flush())
            .map_err(|source| CodegenError::Io {
                path: Utf8PathBuf::from("<stdout>"),
                source,
            })
    }

    /// Turns a report with failures into an error.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Failed`] carrying every failure when the pass
    /// was not clean.
    pub fn into_result(self) -> Result<Vec<GeneratedUnit>, CodegenError> {
        if self.errors.is_empty() {
            Ok(self.units)
        } else {
            Err(CodegenError::Failed {
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};

    #[fixture]
    fn report() -> GenerationReport {
        GenerationReport {
            units: vec![GeneratedUnit {
                target: "crate::Person".to_owned(),
                builder: "PersonBuilder".to_owned(),
                path: Utf8PathBuf::from("out/entity_builders/PersonBuilder.rs"),
            }],
            errors: vec![GenerationError::AbstractTarget {
                entity: "crate::common::BaseEntity".to_owned(),
            }],
            sources: vec![
                Utf8PathBuf::from("src/lib.rs"),
                Utf8PathBuf::from("src/common.rs"),
            ],
        }
    }

    #[rstest]
    fn directives_list_sources_then_warnings(report: GenerationReport) -> Result<()> {
        let mut out = Vec::new();
        report.write_cargo_directives(&mut out)?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();
        ensure!(
            lines
                == [
                    "cargo:rerun-if-changed=src/lib.rs",
                    "cargo:rerun-if-changed=src/common.rs",
                    "cargo:warning=entity_builder_codegen: crate::common::BaseEntity: \
                     abstract entities cannot have a generated builder",
                ],
            "unexpected directives: {text}"
        );
        Ok(())
    }

    #[rstest]
    fn failures_surface_after_the_batch(report: GenerationReport) {
        assert!(!report.is_success());
        let Err(CodegenError::Failed { errors }) = report.into_result() else {
            panic!("a report with errors must fail");
        };
        assert_eq!(errors.len(), 1);
    }

    #[rstest]
    fn clean_reports_yield_their_units(mut report: GenerationReport) {
        report.errors.clear();
        let units = report.into_result().expect("clean report");
        assert_eq!(units.len(), 1);
    }
}
