//! Assignability of override values to declared field types.

use crate::field_type::FieldType;
use crate::value::ValueType;

/// Decides whether a value of runtime type `candidate` may be stored into a
/// field declared as `declared`.
///
/// `null` is accepted for every field here; a non-`Option` field rejects it
/// later, when the instance is populated. Other values match when their type
/// equals the declared type (ignoring `Option`), or when both are numeric and
/// the candidate ranks no wider than the field. Nominal types must match
/// exactly.
#[must_use]
pub fn is_assignable(declared: &FieldType, candidate: ValueType) -> bool {
    match (declared.value_type(), candidate) {
        (_, ValueType::Null) => true,
        (ValueType::Numeric(field), ValueType::Numeric(value)) => value <= field,
        (expected, found) => expected == found,
    }
}
