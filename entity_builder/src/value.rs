//! Dynamically typed values carried from `with` calls to field assignment.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

use crate::field_type::{Numeric, short_type_name};

/// A value waiting to be stored into a field.
///
/// Scalars the default policy and the compatibility checker reason about get
/// their own variants. Everything else (collections, enums, nested entities)
/// travels as an [`ObjectValue`] identified by its [`TypeId`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Value {
    /// Absent value. Accepted for every field at `with` time.
    Null,
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Single character.
    Char(char),
    /// Boolean.
    Bool(bool),
    /// Owned text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// Arbitrary-precision decimal.
    Decimal(BigDecimal),
    /// Any other cloneable value.
    Object(ObjectValue),
}

/// Runtime type of a [`Value`], as seen by the compatibility checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// The `null` value.
    Null,
    /// A numeric scalar.
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
    /// Any other type, compared by identity.
    Object {
        /// Identity of the concrete type.
        type_id: TypeId,
        /// `std::any::type_name` of the concrete type.
        name: &'static str,
    },
}

impl ValueType {
    /// Short, human readable type name used in error messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Numeric(numeric) => numeric.name().to_owned(),
            Self::Char => "char".to_owned(),
            Self::Bool => "bool".to_owned(),
            Self::Text => "String".to_owned(),
            Self::Date => "NaiveDate".to_owned(),
            Self::DateTime => "NaiveDateTime".to_owned(),
            Self::Decimal => "BigDecimal".to_owned(),
            Self::Object { name, .. } => short_type_name(name),
        }
    }
}

impl Value {
    /// Wraps any cloneable value as an opaque object.
    #[must_use]
    pub fn object<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        Self::Object(ObjectValue::new(value))
    }

    /// Returns the runtime type used for compatibility checks.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::I8(_) => ValueType::Numeric(Numeric::Byte),
            Self::I16(_) => ValueType::Numeric(Numeric::Short),
            Self::I32(_) => ValueType::Numeric(Numeric::Int),
            Self::I64(_) => ValueType::Numeric(Numeric::Long),
            Self::F32(_) => ValueType::Numeric(Numeric::Float),
            Self::F64(_) => ValueType::Numeric(Numeric::Double),
            Self::Char(_) => ValueType::Char,
            Self::Bool(_) => ValueType::Bool,
            Self::Text(_) => ValueType::Text,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Object(object) => ValueType::Object {
                type_id: object.type_id,
                name: object.type_name,
            },
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Object(object) => write!(f, "<{}>", short_type_name(object.type_name)),
        }
    }
}

/// Object-safe view of a cloneable, shareable payload.
trait Payload: Any + Send + Sync {
    fn clone_payload(&self) -> Box<dyn Payload>;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> Payload for T
where
    T: Any + Clone + Send + Sync,
{
    fn clone_payload(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A type-erased value that can be cloned for every build.
pub struct ObjectValue {
    type_id: TypeId,
    type_name: &'static str,
    payload: Box<dyn Payload>,
}

impl ObjectValue {
    /// Erases `value`, remembering its concrete type.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload: Box::new(value),
        }
    }

    /// Identity of the erased type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// `std::any::type_name` of the erased type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recovers the concrete value, handing `self` back on a type mismatch.
    ///
    /// # Errors
    ///
    /// Returns the untouched object when it does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if self.type_id != TypeId::of::<T>() {
            return Err(self);
        }
        let Self {
            type_id,
            type_name,
            payload,
        } = self;
        payload
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Self {
                type_id,
                type_name,
                payload: Box::new(Unrecoverable),
            })
    }
}

/// Placeholder left behind if a downcast fails after the identity check.
#[derive(Clone)]
struct Unrecoverable;

impl Clone for ObjectValue {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            payload: (*self.payload).clone_payload(),
        }
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Conversion into a [`Value`], implemented for every supported field type.
pub trait IntoValue {
    /// Converts `self` into a dynamically typed value.
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

macro_rules! scalar_into_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

scalar_into_value! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    bool => Bool,
    String => Text,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    BigDecimal => Decimal,
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

macro_rules! object_into_value {
    ($($container:ident < $($param:ident),+ >),+ $(,)?) => {
        $(
            impl<$($param),+> IntoValue for $container<$($param),+>
            where
                $($param: Any + Clone + Send + Sync,)+
            {
                fn into_value(self) -> Value {
                    Value::object(self)
                }
            }
        )+
    };
}

object_into_value! {
    Vec<T>,
    VecDeque<T>,
    HashSet<T>,
    BTreeSet<T>,
    HashMap<K, V>,
    BTreeMap<K, V>,
}

impl<T, const N: usize> IntoValue for [T; N]
where
    T: Any + Clone + Send + Sync,
{
    fn into_value(self) -> Value {
        Value::object(self)
    }
}
