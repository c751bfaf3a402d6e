//! Error types produced while building entities.

use thiserror::Error;

/// Failures surfaced by [`crate::EntityBuilder`] and the generated builders.
///
/// Every variant names the target type so a failing fixture can be traced
/// back without a backtrace. The enum is `Clone` because typed builders defer
/// the first failure until `build()` and report it on every call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EntityBuilderError {
    /// The builder target is unusable, for example its ancestor chain loops.
    #[error("cannot create a builder for '{entity}': {message}")]
    Precondition {
        /// Fully qualified name of the target type.
        entity: String,
        /// Why the target was rejected.
        message: String,
    },

    /// A `with` call named a missing field or supplied an incompatible value.
    #[error("failed to access field '{field}' in type '{entity}': {reason}")]
    FieldAccess {
        /// Field named by the caller.
        field: String,
        /// Fully qualified name of the target type.
        entity: String,
        /// What went wrong.
        reason: FieldAccessReason,
    },

    /// The instance could not be created or populated.
    #[error("failed to create instance of '{entity}': {reason}")]
    ObjectCreation {
        /// Fully qualified name of the target type.
        entity: String,
        /// Message of the underlying cause.
        reason: String,
    },
}

/// Why a field could not be accessed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FieldAccessReason {
    /// No field with that name exists anywhere in the entity hierarchy.
    #[error("field doesn't exist")]
    Missing,

    /// The value cannot be stored in the field.
    #[error("value of type '{value_type}' cannot be assigned to field of type '{declared}'")]
    Incompatible {
        /// Runtime type of the rejected value.
        value_type: String,
        /// Declared type of the field.
        declared: String,
    },
}

/// Failure reported by [`crate::Entity::construct`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstructError {
    /// The type declares no accessible no-argument constructor.
    #[error("no public no-args constructor available")]
    Missing,

    /// The type is abstract and only usable as a base.
    #[error("abstract types cannot be instantiated")]
    Abstract,

    /// The constructor ran and failed.
    #[error("constructor failed: {0}")]
    Failed(String),
}

impl ConstructError {
    /// Wraps the message of a constructor failure.
    #[must_use]
    pub fn failed(cause: &impl std::fmt::Display) -> Self {
        Self::Failed(cause.to_string())
    }
}

/// Failure reported while storing a value into a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AssignError {
    /// The entity has no field with this name.
    #[error("no field named '{0}'")]
    UnknownField(String),

    /// `null` reached a field that cannot represent it.
    #[error("cannot assign null to field '{field}' of non-nullable type '{declared}'")]
    NullValue {
        /// Field being assigned, empty until the entity fills it in.
        field: String,
        /// Declared type of the field.
        declared: String,
    },

    /// The value's runtime type does not convert into the field type.
    #[error("value of type '{found}' does not fit field '{field}' of type '{expected}'")]
    Mismatch {
        /// Field being assigned, empty until the entity fills it in.
        field: String,
        /// Declared type of the field.
        expected: String,
        /// Runtime type of the value.
        found: String,
    },
}

impl AssignError {
    /// Attaches the field name to a conversion failure.
    ///
    /// [`crate::FieldValue::from_value`] does not know which field it fills,
    /// so derived `assign` implementations call this on the way out.
    #[must_use]
    pub fn for_field(self, name: &str) -> Self {
        match self {
            Self::NullValue { declared, .. } => Self::NullValue {
                field: name.to_owned(),
                declared,
            },
            Self::Mismatch {
                expected, found, ..
            } => Self::Mismatch {
                field: name.to_owned(),
                expected,
                found,
            },
            other @ Self::UnknownField(_) => other,
        }
    }
}
