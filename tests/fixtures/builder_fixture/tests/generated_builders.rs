//! Behaviour of the builders generated by `build.rs`.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Result, ensure};
use bigdecimal::BigDecimal;
use builder_fixture::catalog::{Promotion, PromotionBuilder};
use builder_fixture::outer::{AnotherNestedEntity, AnotherNestedEntityBuilder, NestedEntity};
use builder_fixture::{
    ExtendedEntity, ExtendedEntityBuilder, Person, PersonBuilder, Priority, Product,
    ProductBuilder, Status,
};
use chrono::{NaiveDate, NaiveDateTime};
use entity_builder::{Clock, DiagnosticEvent, EntityBuilder, EntityBuilderError, builder};
use rstest::{fixture, rstest};
use test_helpers::diagnostics::RecordingSink;

#[fixture]
fn instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|date| date.and_hms_opt(9, 15, 0))
        .unwrap_or_default()
}

#[rstest]
fn unset_fields_take_policy_defaults() -> Result<()> {
    let person = PersonBuilder::new().build()?;
    ensure!(person.first_name == "test_first_name");
    ensure!(person.last_name == "test_last_name");
    ensure!(person.age == 1);
    ensure!(!person.active);
    ensure!(person.tags.is_empty());
    Ok(())
}

#[rstest]
fn setters_override_defaults() -> Result<()> {
    let person = PersonBuilder::new()
        .with_first_name("Ada".to_owned())
        .with_age(36)
        .with_tags(vec!["admin".to_owned()])
        .build()?;
    ensure!(
        person
            == Person {
                first_name: "Ada".to_owned(),
                last_name: "test_last_name".to_owned(),
                age: 36,
                active: false,
                tags: vec!["admin".to_owned()],
            }
    );
    Ok(())
}

#[rstest]
fn the_last_setter_call_wins() -> Result<()> {
    let person = PersonBuilder::new().with_age(20).with_age(21).build()?;
    ensure!(person.age == 21);
    Ok(())
}

#[rstest]
fn typed_and_runtime_builders_agree(instant: NaiveDateTime) -> Result<()> {
    let typed = ProductBuilder::new()
        .clock(Clock::Fixed(instant))
        .with_name("Lamp".to_owned())
        .build()?;
    let runtime = EntityBuilder::<Product>::of()?
        .with_clock(Clock::Fixed(instant))
        .with("name", "Lamp")?
        .build()?;
    ensure!(typed == runtime, "{typed:?} != {runtime:?}");
    Ok(())
}

#[rstest]
fn inherited_fields_are_independently_settable(instant: NaiveDateTime) -> Result<()> {
    let product = ProductBuilder::new()
        .clock(Clock::Fixed(instant))
        .with_id(42)
        .with_stock(7)
        .build()?;
    ensure!(product.base.id == 42);
    ensure!(product.base.created_at == instant);
    ensure!(product.base.created_by == "test_created_by");
    ensure!(product.stock == 7);
    ensure!(product.name == "test_name");
    ensure!(product.price == BigDecimal::from(1));
    ensure!(product.status == Status::Draft);
    Ok(())
}

#[rstest]
fn two_level_inheritance_keeps_the_nearest_field() -> Result<()> {
    let promotion: Promotion = PromotionBuilder::new()
        .with_discount(15)
        .with_created_by("ops".to_owned())
        .build()?;
    ensure!(promotion.discount == 15);
    ensure!(promotion.name == "test_name");
    ensure!(promotion.product.name.is_empty(), "shadowed field keeps its constructed value");
    ensure!(promotion.product.stock == 1);
    ensure!(promotion.product.base.created_by == "ops");
    ensure!(promotion.product.base.id == 1);
    Ok(())
}

#[rstest]
fn repeated_builds_do_not_share_values() -> Result<()> {
    let builder = PersonBuilder::new().with_tags(vec!["a".to_owned()]);
    let mut first = builder.build()?;
    let second = builder.build()?;
    ensure!(first == second);
    first.tags.push("b".to_owned());
    ensure!(second.tags == ["a"], "second build was aliased: {second:?}");
    Ok(())
}

#[rstest]
fn every_type_category_has_its_default(instant: NaiveDateTime) -> Result<()> {
    let sink = RecordingSink::new();
    let entity = ExtendedEntityBuilder::new()
        .clock(Clock::Fixed(instant))
        .diagnostics(sink.clone())
        .build()?;
    let expected = ExtendedEntity {
        tiny: 1,
        small: 1,
        count: 1,
        big: 1,
        ratio: 1.0,
        precise: 1.0,
        initial: 'A',
        flag: false,
        label: "test_label".to_owned(),
        born_on: instant.date(),
        updated_at: instant,
        amount: BigDecimal::from(1),
        maybe_count: Some(1),
        maybe_label: Some("test_maybe_label".to_owned()),
        priority: Priority::Low,
        ..ExtendedEntity::default()
    };
    ensure!(entity == expected, "{entity:#?}");
    ensure!(sink.missing_defaults() == ["grid", "owner"]);
    Ok(())
}

#[rstest]
fn containers_and_nominal_fields_accept_overrides() -> Result<()> {
    let owner = PersonBuilder::new().with_first_name("Grace".to_owned()).build()?;
    let entity = ExtendedEntityBuilder::new()
        .with_unique(HashSet::from(["x".to_owned()]))
        .with_ordered(BTreeMap::from([("k".to_owned(), "v".to_owned())]))
        .with_grid([1, 2, 3])
        .with_owner(owner.clone())
        .with_priority(Priority::High)
        .with_maybe_label(None)
        .build()?;
    ensure!(entity.unique.contains("x"));
    ensure!(entity.ordered.get("k").map(String::as_str) == Some("v"));
    ensure!(entity.grid == [1, 2, 3]);
    ensure!(entity.owner == owner);
    ensure!(entity.priority == Priority::High);
    ensure!(entity.maybe_label.is_none());
    Ok(())
}

#[rstest]
fn nested_targets_build_each_other() -> Result<()> {
    let nested = builder::<NestedEntity>().with_count(3).build()?;
    let outer: AnotherNestedEntity = AnotherNestedEntityBuilder::new()
        .with_reference(Some(nested.clone()))
        .build()?;
    ensure!(outer.nested_field == "test_nested_field");
    ensure!(outer.reference == Some(nested));
    ensure!(builder::<AnotherNestedEntity>().build()?.reference.is_none());
    Ok(())
}

#[rstest]
fn builder_lookup_returns_the_generated_type() -> Result<()> {
    let person: Person = builder::<Person>().with_last_name("Hopper".to_owned()).build()?;
    ensure!(person.last_name == "Hopper");
    Ok(())
}

#[rstest]
fn diagnostics_follow_the_build() -> Result<()> {
    let sink = RecordingSink::new();
    PersonBuilder::new()
        .diagnostics(sink.clone())
        .with_age(50)
        .build()?;
    let events = sink.events();
    ensure!(matches!(
        events.first(),
        Some(DiagnosticEvent::OverrideAccepted { field, .. }) if field == "age"
    ));
    ensure!(matches!(
        events.last(),
        Some(DiagnosticEvent::Built { defaults: 4, overrides: 1 })
    ));
    Ok(())
}

#[rstest]
fn runtime_builder_rejects_unknown_fields() {
    let err = EntityBuilder::<Product>::of()
        .and_then(|builder| builder.with("colour", "red"))
        .map(|_| ())
        .expect_err("unknown field must fail");
    assert!(matches!(err, EntityBuilderError::FieldAccess { ref field, .. } if field == "colour"));
    assert!(err.to_string().contains("builder_fixture::catalog::Product"), "{err}");
}
