//! Steps that create builders, build customers and inspect the outcome.

use crate::fixtures::{BuildContext, Customer, fixed_instant};
use anyhow::{Context, Result, anyhow, ensure};
use entity_builder::{Clock, DiagnosticEvent, EntityBuilder, EntityBuilderError};
use rstest_bdd_macros::{given, then, when};
use test_helpers::diagnostics::RecordingSink;

#[given("a customer builder")]
fn customer_builder(build_context: &BuildContext) -> Result<()> {
    let sink = RecordingSink::new();
    let builder = EntityBuilder::<Customer>::of()?
        .with_clock(Clock::Fixed(fixed_instant()))
        .with_sink(sink.clone());
    build_context.sink.set(sink);
    build_context.builder.set(builder);
    Ok(())
}

#[given("a builder for the abstract audit base")]
fn abstract_builder(build_context: &BuildContext) -> Result<()> {
    let built = EntityBuilder::<crate::fixtures::Audited>::of()?.build();
    let err = built
        .err()
        .ok_or_else(|| anyhow!("the abstract base unexpectedly built"))?;
    build_context.error.set(err);
    Ok(())
}

#[when("the customer is built")]
fn build_customer(build_context: &BuildContext) -> Result<()> {
    let outcome = build_context
        .builder
        .with_ref(EntityBuilder::build)
        .context("no builder was created")?;
    match outcome {
        Ok(customer) => {
            build_context.built.set(customer);
        }
        Err(err) => {
            build_context.error.set(err);
        }
    }
    Ok(())
}

#[when("the customer is built twice")]
fn build_twice(build_context: &BuildContext) -> Result<()> {
    let (first, second) = build_context
        .builder
        .with_ref(|builder| (builder.build(), builder.build()))
        .context("no builder was created")?;
    let first_customer = first?;
    ensure!(first_customer == second?, "repeated builds differ");
    build_context.built.set(first_customer);
    Ok(())
}

fn built(build_context: &BuildContext) -> Result<Customer> {
    build_context
        .built
        .get()
        .ok_or_else(|| anyhow!("no customer was built"))
}

#[then("the customer's {field} is {expected}")]
fn field_equals(build_context: &BuildContext, field: String, expected: String) -> Result<()> {
    let customer = built(build_context)?;
    let actual = customer
        .field_text(&field)
        .with_context(|| format!("customer has no field {field}"))?;
    ensure!(actual == expected, "{field} was {actual}, expected {expected}");
    Ok(())
}

#[then("the creation time equals the fixed instant")]
fn created_at_is_fixed(build_context: &BuildContext) -> Result<()> {
    let customer = built(build_context)?;
    ensure!(customer.audit.created_at == fixed_instant());
    Ok(())
}

#[then("{count:usize} defaults were applied")]
fn defaults_applied(build_context: &BuildContext, count: usize) -> Result<()> {
    let sink = build_context
        .sink
        .get()
        .ok_or_else(|| anyhow!("no diagnostics sink"))?;
    let applied = sink
        .events()
        .iter()
        .filter(|event| matches!(event, DiagnosticEvent::DefaultApplied { .. }))
        .count();
    ensure!(applied == count, "{applied} defaults applied, expected {count}");
    Ok(())
}

fn failure(build_context: &BuildContext) -> Result<EntityBuilderError> {
    build_context
        .error
        .take()
        .ok_or_else(|| anyhow!("no error was recorded"))
}

#[then("building fails because the instance cannot be created")]
fn creation_failed(build_context: &BuildContext) -> Result<()> {
    let err = failure(build_context)?;
    ensure!(
        matches!(err, EntityBuilderError::ObjectCreation { .. }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[then("the error mentions {text}")]
fn error_mentions(build_context: &BuildContext, text: String) -> Result<()> {
    let message = build_context
        .error
        .with_ref(ToString::to_string)
        .ok_or_else(|| anyhow!("no error was recorded"))?;
    ensure!(message.contains(&text), "`{message}` does not mention {text}");
    Ok(())
}

#[then("the override of {field} is rejected")]
fn override_rejected(build_context: &BuildContext, field: String) -> Result<()> {
    let err = failure(build_context)?;
    ensure!(
        matches!(err, EntityBuilderError::FieldAccess { field: ref name, .. } if *name == field),
        "unexpected error: {err}"
    );
    Ok(())
}
