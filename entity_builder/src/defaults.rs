//! Deterministic default values for fields without an override.
//!
//! Defaults are deliberately fake: numbers are `1`, text is prefixed with
//! `test_`, dates are "now". Containers are fresh and empty on every call.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::entity::FieldDescriptor;
use crate::field_type::{Numeric, TypeKind};
use crate::value::Value;

/// Prefix of every synthesised text default.
pub const TEXT_PREFIX: &str = "test_";

/// Returns the default for `field`, or `None` when its type has none.
///
/// `now` supplies date and date-time defaults so one build uses one instant.
#[must_use]
pub fn default_for(field: &FieldDescriptor, now: NaiveDateTime) -> Option<Value> {
    let value = match field.field_type().kind() {
        TypeKind::Numeric(numeric) => numeric_one(numeric),
        TypeKind::Char => Value::Char('A'),
        TypeKind::Bool => Value::Bool(false),
        TypeKind::Text => Value::Text(format!("{TEXT_PREFIX}{}", field.name())),
        TypeKind::Date => Value::Date(now.date()),
        TypeKind::DateTime => Value::DateTime(now),
        TypeKind::Decimal => Value::Decimal(BigDecimal::from(1)),
        TypeKind::Sequence { empty } | TypeKind::Set { empty } | TypeKind::Mapping { empty } => {
            empty()
        }
        TypeKind::Enum { first } => return first(),
        TypeKind::Nominal => return None,
    };
    Some(value)
}

const fn numeric_one(numeric: Numeric) -> Value {
    match numeric {
        Numeric::Byte => Value::I8(1),
        Numeric::Short => Value::I16(1),
        Numeric::Int => Value::I32(1),
        Numeric::Long => Value::I64(1),
        Numeric::Float => Value::F32(1.0),
        Numeric::Double => Value::F64(1.0),
    }
}
