//! Steps recording overrides on the scenario's builder.

use crate::fixtures::{BuildContext, Customer};
use anyhow::{Result, anyhow};
use entity_builder::{EntityBuilder, IntoValue, Value};
use rstest_bdd_macros::when;

fn apply(build_context: &BuildContext, field: &str, value: impl IntoValue) -> Result<()> {
    let builder: EntityBuilder<Customer> = build_context
        .builder
        .take()
        .ok_or_else(|| anyhow!("no builder was created"))?;
    match builder.with(field, value) {
        Ok(updated) => {
            build_context.builder.set(updated);
        }
        Err(err) => {
            build_context.error.set(err);
        }
    }
    Ok(())
}

#[when("{field} is set to the text {value}")]
fn set_text(build_context: &BuildContext, field: String, value: String) -> Result<()> {
    apply(build_context, &field, value)
}

#[when("{field} is set to the number {value:i32}")]
fn set_number(build_context: &BuildContext, field: String, value: i32) -> Result<()> {
    apply(build_context, &field, value)
}

#[when("{field} is set to the flag {value}")]
fn set_flag(build_context: &BuildContext, field: String, value: bool) -> Result<()> {
    apply(build_context, &field, value)
}

#[when("{field} is set to nothing")]
fn set_null(build_context: &BuildContext, field: String) -> Result<()> {
    apply(build_context, &field, Value::Null)
}
