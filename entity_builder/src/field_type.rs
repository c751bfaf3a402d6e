//! Declared field types and the conversions that store values into them.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

use crate::entity::EntityEnum;
use crate::error::AssignError;
use crate::value::{Value, ValueType};

/// Numeric scalar kinds in widening order.
///
/// The derived ordering is the rank used by numeric widening: a value may be
/// stored into any field whose rank is greater than or equal to its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Numeric {
    /// `i8`.
    Byte,
    /// `i16`.
    Short,
    /// `i32`.
    Int,
    /// `i64`.
    Long,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
}

impl Numeric {
    /// Rust spelling of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
        }
    }
}

/// Category of a declared field type.
///
/// Container, enum and nominal kinds carry the constructors the default
/// policy needs, so the policy never has to know the concrete type.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum TypeKind {
    /// Signed integer or float.
    Numeric(Numeric),
    /// `char`.
    Char,
    /// `bool`.
    Bool,
    /// `String`.
    Text,
    /// `NaiveDate`.
    Date,
    /// `NaiveDateTime`.
    DateTime,
    /// `BigDecimal`.
    Decimal,
    /// Ordered sequence such as `Vec<T>`.
    Sequence {
        /// Produces a fresh empty container.
        empty: fn() -> Value,
    },
    /// Unique-element set such as `HashSet<T>`.
    Set {
        /// Produces a fresh empty container.
        empty: fn() -> Value,
    },
    /// Key-value mapping such as `HashMap<K, V>`.
    Mapping {
        /// Produces a fresh empty container.
        empty: fn() -> Value,
    },
    /// Enum registered with `#[derive(EntityEnum)]`.
    Enum {
        /// First declared variant, if any.
        first: fn() -> Option<Value>,
    },
    /// Any other type: nested entities, arrays and the like.
    Nominal,
}

/// Declared type of an entity field.
#[derive(Clone, Copy)]
pub struct FieldType {
    kind: TypeKind,
    nullable: bool,
    type_id: TypeId,
    type_name: &'static str,
    declared_name: &'static str,
}

impl FieldType {
    /// Describes the non-nullable type `T` as belonging to `kind`.
    #[must_use]
    pub fn of<T: Any>(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            declared_name: std::any::type_name::<T>(),
        }
    }

    /// Describes an enum registered through [`EntityEnum`].
    #[must_use]
    pub fn enumeration<E: EntityEnum>() -> Self {
        Self::of::<E>(TypeKind::Enum {
            first: first_variant::<E>,
        })
    }

    /// Describes a type without a default, such as a nested entity.
    #[must_use]
    pub fn nominal<T: Any>() -> Self {
        Self::of::<T>(TypeKind::Nominal)
    }

    /// Marks the type as the `Option` wrapped form declared as `Wrapper`.
    #[must_use]
    pub fn nullable_as<Wrapper: Any>(self) -> Self {
        Self {
            nullable: true,
            declared_name: std::any::type_name::<Wrapper>(),
            ..self
        }
    }

    /// Category of the type.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the field is declared as `Option<_>`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Identity of the type inside any `Option`.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Runtime type a non-null value must have to match without widening.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self.kind {
            TypeKind::Numeric(numeric) => ValueType::Numeric(numeric),
            TypeKind::Char => ValueType::Char,
            TypeKind::Bool => ValueType::Bool,
            TypeKind::Text => ValueType::Text,
            TypeKind::Date => ValueType::Date,
            TypeKind::DateTime => ValueType::DateTime,
            TypeKind::Decimal => ValueType::Decimal,
            TypeKind::Sequence { .. }
            | TypeKind::Set { .. }
            | TypeKind::Mapping { .. }
            | TypeKind::Enum { .. }
            | TypeKind::Nominal => ValueType::Object {
                type_id: self.type_id,
                name: self.type_name,
            },
        }
    }

    /// Short name of the declared type, including any `Option`.
    #[must_use]
    pub fn name(&self) -> String {
        short_type_name(self.declared_name)
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldType")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .finish()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn first_variant<E: EntityEnum>() -> Option<Value> {
    E::VARIANTS.first().cloned().map(Value::object)
}

/// Strips module paths from a `std::any::type_name` rendering.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(ch);
        if !(ch.is_alphanumeric() || ch == '_') {
            segment_start = out.len();
        }
    }
    out
}

/// A type that can be declared as an entity field.
///
/// Implemented here for scalars, text, dates, decimals, the standard
/// collections, `Option<T>` and arrays. `#[derive(Entity)]` and
/// `#[derive(EntityEnum)]` implement it for user types.
pub trait FieldValue: Sized + 'static {
    /// Declared type description consumed by the resolver and policy.
    fn field_type() -> FieldType;

    /// Converts a checked value into the field's type.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::NullValue`] for `null` on a non-`Option` field
    /// and [`AssignError::Mismatch`] when the value cannot be converted.
    fn from_value(value: Value) -> Result<Self, AssignError>;
}

/// Builds the mismatch error for a value that cannot become `T`.
#[must_use]
pub fn mismatch<T: FieldValue>(value: &Value) -> AssignError {
    if value.is_null() {
        return AssignError::NullValue {
            field: String::new(),
            declared: T::field_type().name(),
        };
    }
    AssignError::Mismatch {
        field: String::new(),
        expected: T::field_type().name(),
        found: value.value_type().name(),
    }
}

/// Recovers an object-typed field value, used by derived impls.
///
/// # Errors
///
/// Returns a mismatch when `value` does not hold a `T`.
pub fn object_from_value<T>(value: Value) -> Result<T, AssignError>
where
    T: FieldValue,
{
    match value {
        Value::Object(object) => object
            .downcast::<T>()
            .map_err(|object| mismatch::<T>(&Value::Object(object))),
        other => Err(mismatch::<T>(&other)),
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_type() -> FieldType {
        T::field_type().nullable_as::<Self>()
    }

    fn from_value(value: Value) -> Result<Self, AssignError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! numeric_field {
    ($ty:ty, $numeric:ident, |$value:ident| { $($arm:pat => $convert:expr),+ $(,)? }) => {
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::of::<$ty>(TypeKind::Numeric(Numeric::$numeric))
            }

            fn from_value($value: Value) -> Result<Self, AssignError> {
                match $value {
                    $($arm => Ok($convert),)+
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

numeric_field!(i8, Byte, |value| { Value::I8(v) => v });
numeric_field!(i16, Short, |value| {
    Value::I8(v) => Self::from(v),
    Value::I16(v) => v,
});
numeric_field!(i32, Int, |value| {
    Value::I8(v) => Self::from(v),
    Value::I16(v) => Self::from(v),
    Value::I32(v) => v,
});
numeric_field!(i64, Long, |value| {
    Value::I8(v) => Self::from(v),
    Value::I16(v) => Self::from(v),
    Value::I32(v) => Self::from(v),
    Value::I64(v) => v,
});
numeric_field!(f32, Float, |value| {
    Value::I8(v) => Self::from(v),
    Value::I16(v) => Self::from(v),
    Value::I32(v) => lossy_f32(i64::from(v)),
    Value::I64(v) => lossy_f32(v),
    Value::F32(v) => v,
});
numeric_field!(f64, Double, |value| {
    Value::I8(v) => Self::from(v),
    Value::I16(v) => Self::from(v),
    Value::I32(v) => Self::from(v),
    Value::I64(v) => lossy_f64(v),
    Value::F32(v) => Self::from(v),
    Value::F64(v) => v,
});

#[expect(
    clippy::cast_precision_loss,
    reason = "integer to float widening is accepted even when lossy"
)]
const fn lossy_f32(value: i64) -> f32 {
    value as f32
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer to float widening is accepted even when lossy"
)]
const fn lossy_f64(value: i64) -> f64 {
    value as f64
}

macro_rules! exact_field {
    ($($ty:ty => $variant:ident as $kind:ident),+ $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::of::<$ty>(TypeKind::$kind)
                }

                fn from_value(value: Value) -> Result<Self, AssignError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )+
    };
}

exact_field! {
    char => Char as Char,
    bool => Bool as Bool,
    String => Text as Text,
    NaiveDate => Date as Date,
    NaiveDateTime => DateTime as DateTime,
    BigDecimal => Decimal as Decimal,
}

fn empty_of<C>() -> Value
where
    C: Any + Clone + Default + Send + Sync,
{
    Value::object(C::default())
}

macro_rules! container_field {
    ($($container:ident < $($param:ident),+ > => $kind:ident),+ $(,)?) => {
        $(
            impl<$($param),+> FieldValue for $container<$($param),+>
            where
                $($param: Any + Clone + Send + Sync,)+
                Self: Default,
            {
                fn field_type() -> FieldType {
                    FieldType::of::<Self>(TypeKind::$kind {
                        empty: empty_of::<Self>,
                    })
                }

                fn from_value(value: Value) -> Result<Self, AssignError> {
                    object_from_value(value)
                }
            }
        )+
    };
}

container_field! {
    Vec<T> => Sequence,
    VecDeque<T> => Sequence,
    HashSet<T> => Set,
    BTreeSet<T> => Set,
    HashMap<K, V> => Mapping,
    BTreeMap<K, V> => Mapping,
}

impl<T, const N: usize> FieldValue for [T; N]
where
    T: Any + Clone + Send + Sync,
{
    fn field_type() -> FieldType {
        FieldType::nominal::<Self>()
    }

    fn from_value(value: Value) -> Result<Self, AssignError> {
        object_from_value(value)
    }
}
