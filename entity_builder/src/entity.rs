//! Compile-time field tables describing buildable types.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{AssignError, ConstructError};
use crate::field_type::{FieldType, FieldValue};
use crate::resolver;
use crate::value::Value;

/// A struct the runtime builder can instantiate and populate.
///
/// Normally derived with `#[derive(Entity)]`, which records every named field
/// except those marked `#[entity(skip)]`, links the `#[entity(base)]` field as
/// the parent entity, and dispatches [`Entity::assign`] by field name.
pub trait Entity: Sized + 'static {
    /// Static description of the type's own fields and its parent.
    fn entity_type() -> &'static EntityType;

    /// Runs the type's no-argument constructor.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when the type is abstract, declares no
    /// accessible constructor, or the constructor itself fails.
    fn construct() -> Result<Self, ConstructError>;

    /// Stores `value` into the field named `field`, searching own fields
    /// before the embedded base entity.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::UnknownField`] when no field in the hierarchy
    /// has that name, or a conversion error from [`FieldValue::from_value`].
    fn assign(&mut self, field: &str, value: Value) -> Result<(), AssignError>;
}

/// An enum whose default is its first declared variant.
pub trait EntityEnum: Any + Clone + Send + Sync {
    /// Every variant in declaration order.
    const VARIANTS: &'static [Self];
}

/// One field as declared on an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    owner: &'static str,
    field_type: FieldType,
}

impl FieldDescriptor {
    /// Describes the field `name` of type `T` declared on `owner`.
    #[must_use]
    pub fn of<T: FieldValue>(name: &'static str, owner: &'static str) -> Self {
        Self {
            name,
            owner,
            field_type: T::field_type(),
        }
    }

    /// Field name as written in the struct.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Short name of the entity declaring the field.
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Declared type.
    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }
}

/// Descriptor of an entity type: its own fields, its parent and its
/// constructor capability.
pub struct EntityType {
    name: &'static str,
    path: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDescriptor>,
    parent: Option<fn() -> &'static EntityType>,
    is_abstract: bool,
    resolved: OnceLock<Vec<FieldDescriptor>>,
}

impl EntityType {
    /// Starts a descriptor for `T` with no fields and no parent.
    #[must_use]
    pub fn new<T: Any>(name: &'static str) -> Self {
        Self {
            name,
            path: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            fields: Vec::new(),
            parent: None,
            is_abstract: false,
            resolved: OnceLock::new(),
        }
    }

    /// Appends an own field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Links the parent entity whose fields are inherited.
    #[must_use]
    pub fn with_parent(mut self, parent: fn() -> &'static Self) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Marks the type as usable only as a base.
    #[must_use]
    pub const fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Short type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified type path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Identity of the described type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields declared directly on this type, in declaration order.
    #[must_use]
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The parent entity, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'static Self> {
        self.parent.map(|parent| parent())
    }

    /// Whether the type is abstract.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The flattened field list, resolved once and cached.
    #[must_use]
    pub fn fields(&'static self) -> &'static [FieldDescriptor] {
        self.resolved.get_or_init(|| resolver::resolve_fields(self))
    }

    /// Looks up a resolvable field by name.
    #[must_use]
    pub fn field(&'static self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields().iter().find(|field| field.name == name)
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("path", &self.path)
            .field("fields", &self.fields)
            .field("parent", &self.parent().map(Self::path))
            .field("is_abstract", &self.is_abstract)
            .finish_non_exhaustive()
    }
}
