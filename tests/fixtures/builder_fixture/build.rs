//! Generates typed builders for every marked entity in this crate.

use entity_builder_codegen::CodegenError;

fn main() -> Result<(), CodegenError> {
    let report = entity_builder_codegen::generate_builders()?;
    report.emit_cargo_directives()?;
    report.into_result()?;
    Ok(())
}
