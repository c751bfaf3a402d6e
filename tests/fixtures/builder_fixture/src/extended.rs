//! An entity covering every declared type category.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use entity_builder::{Entity, EntityEnum};

use crate::person::Person;

/// Urgency of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EntityEnum)]
pub enum Priority {
    /// Can wait.
    #[default]
    Low,
    /// Normal.
    Medium,
    /// Needs attention now.
    High,
}

/// One field of each kind the default policy knows about, plus a few it
/// does not.
#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[entity(generate_builder)]
pub struct ExtendedEntity {
    /// 8-bit integer.
    pub tiny: i8,
    /// 16-bit integer.
    pub small: i16,
    /// 32-bit integer.
    pub count: i32,
    /// 64-bit integer.
    pub big: i64,
    /// 32-bit float.
    pub ratio: f32,
    /// 64-bit float.
    pub precise: f64,
    /// Single character.
    pub initial: char,
    /// Boolean.
    pub flag: bool,
    /// Text.
    pub label: String,
    /// Calendar date.
    pub born_on: NaiveDate,
    /// Date and time.
    pub updated_at: NaiveDateTime,
    /// Arbitrary-precision decimal.
    pub amount: BigDecimal,
    /// Ordered sequence.
    pub items: Vec<String>,
    /// Double-ended queue.
    pub queue: VecDeque<i32>,
    /// Unordered set.
    pub unique: HashSet<String>,
    /// Ordered set.
    pub sorted: BTreeSet<i64>,
    /// Unordered mapping.
    pub lookup: HashMap<String, i32>,
    /// Ordered mapping.
    pub ordered: BTreeMap<String, String>,
    /// Enumerated type.
    pub priority: Priority,
    /// Nullable number.
    pub maybe_count: Option<i32>,
    /// Nullable text.
    pub maybe_label: Option<String>,
    /// Fixed-size array, which has no default.
    pub grid: [i32; 3],
    /// Nested entity, which has no default.
    pub owner: Person,
    /// Not visible to builders.
    #[entity(skip)]
    pub revision: u32,
}

entity_builder::include_builder!(ExtendedEntityBuilder in extended);
