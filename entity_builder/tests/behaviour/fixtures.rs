//! Shared fixtures for the behavioural scenarios.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use entity_builder::{Entity, EntityBuilder, EntityBuilderError};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::diagnostics::RecordingSink;

/// Abstract base carrying audit columns.
#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[entity(abstract)]
pub struct Audited {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub created_by: String,
}

/// Target entity used throughout the scenarios.
#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct Customer {
    #[entity(base)]
    pub audit: Audited,
    pub name: String,
    pub age: i32,
    pub vip: bool,
    pub nickname: Option<String>,
}

impl Customer {
    /// Renders the named field, searching the embedded base as well.
    #[must_use]
    pub fn field_text(&self, field: &str) -> Option<String> {
        let text = match field {
            "name" => self.name.clone(),
            "age" => self.age.to_string(),
            "vip" => self.vip.to_string(),
            "nickname" => self
                .nickname
                .clone()
                .unwrap_or_else(|| "nothing".to_owned()),
            "id" => self.audit.id.to_string(),
            "created_at" => self.audit.created_at.to_string(),
            "created_by" => self.audit.created_by.clone(),
            _ => return None,
        };
        Some(text)
    }
}

/// The fixed instant every scenario builds against.
#[must_use]
pub fn fixed_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 31)
        .and_then(|date| date.and_hms_opt(8, 30, 0))
        .unwrap_or_default()
}

/// Scenario state shared between steps.
#[derive(Debug, Default, ScenarioState)]
pub struct BuildContext {
    pub builder: Slot<EntityBuilder<Customer>>,
    pub built: Slot<Customer>,
    pub error: Slot<EntityBuilderError>,
    pub sink: Slot<Arc<RecordingSink>>,
}

/// Creates a clean context for each scenario.
#[fixture]
pub fn build_context() -> BuildContext {
    BuildContext::default()
}
