//! The reflective runtime builder.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::clock::Clock;
use crate::compat;
use crate::defaults;
use crate::diagnostics::{Diagnostic, DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::entity::{Entity, EntityType};
use crate::error::{EntityBuilderError, FieldAccessReason};
use crate::resolver;
use crate::value::{IntoValue, Value};


/// Short identifier attached to every diagnostic a builder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId(u64);

impl BuilderId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BuilderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Builds populated instances of `T`.
///
/// Overrides are validated as they arrive. [`EntityBuilder::build`] then
/// constructs `T`, fills every field without an override from the default
/// policy, and finally applies the overrides, so an override always wins
/// regardless of call order.
///
/// ```rust
/// use entity_builder::{Entity, EntityBuilder};
///
/// #[derive(Debug, Clone, Default, Entity)]
/// struct Account {
///     owner: String,
///     balance: i64,
/// }
///
/// # fn main() -> Result<(), entity_builder::EntityBuilderError> {
/// let builder = EntityBuilder::<Account>::of()?.with("balance", 5_i32)?;
/// let first = builder.build()?;
/// let second = builder.build()?;
/// assert_eq!(first.balance, 5);
/// assert_eq!(first.owner, second.owner);
/// # Ok(())
/// # }
/// ```
pub struct EntityBuilder<T: Entity> {
    id: BuilderId,
    entity: &'static EntityType,
    overrides: HashMap<String, Value>,
    sink: Arc<dyn DiagnosticSink>,
    clock: Clock,
    target: PhantomData<fn() -> T>,
}

impl<T: Entity> EntityBuilder<T> {
    /// Binds a new builder to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityBuilderError::Precondition`] when the ancestor chain
    /// of `T` loops.
    pub fn of() -> Result<Self, EntityBuilderError> {
        let entity = T::entity_type();
        if let Some(repeated) = resolver::find_cycle(entity) {
            return Err(EntityBuilderError::Precondition {
                entity: entity.path().to_owned(),
                message: format!(
                    "ancestor chain revisits '{}'; only single, acyclic inheritance is supported",
                    repeated.path()
                ),
            });
        }
        let builder = Self {
            id: BuilderId::next(),
            entity,
            overrides: HashMap::new(),
            sink: Arc::new(TracingSink),
            clock: Clock::default(),
            target: PhantomData,
        };
        builder.report(DiagnosticEvent::Created);
        Ok(builder)
    }

    /// Routes subsequent diagnostics to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Uses `clock` for date and date-time defaults.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Identifier included in this builder's diagnostics.
    #[must_use]
    pub const fn id(&self) -> BuilderId {
        self.id
    }

    /// Descriptor of the target type.
    #[must_use]
    pub const fn entity_type(&self) -> &'static EntityType {
        self.entity
    }

    /// Records an override for `field`, replacing any earlier one.
    ///
    /// `null` passes validation for every field. A non-`Option` field rejects
    /// it when the instance is built.
    ///
    /// # Errors
    ///
    /// Returns [`EntityBuilderError::FieldAccess`] when no field named
    /// `field` exists in the flattened hierarchy, or when the value's type
    /// cannot be stored in it.
    pub fn with(mut self, field: &str, value: impl IntoValue) -> Result<Self, EntityBuilderError> {
        let stored = value.into_value();
        let Some(descriptor) = self.entity.field(field) else {
            return Err(self.reject(field, FieldAccessReason::Missing));
        };
        let declared = descriptor.field_type();
        let candidate = stored.value_type();
        if !compat::is_assignable(declared, candidate) {
            return Err(self.reject(
                field,
                FieldAccessReason::Incompatible {
                    value_type: candidate.name(),
                    declared: declared.name(),
                },
            ));
        }
        self.report(DiagnosticEvent::OverrideAccepted {
            field: field.to_owned(),
            value: stored.to_string(),
        });
        self.overrides.insert(field.to_owned(), stored);
        Ok(self)
    }

    /// Builds a new, independent instance.
    ///
    /// The override map is left untouched, so the same builder can be built
    /// repeatedly. Each build reads the clock once and clones every override.
    ///
    /// # Errors
    ///
    /// Returns [`EntityBuilderError::ObjectCreation`] when `T` cannot be
    /// constructed or a value cannot be stored, for example `null` for a
    /// non-`Option` field.
    pub fn build(&self) -> Result<T, EntityBuilderError> {
        let mut instance = T::construct().map_err(|err| self.creation_error(&err))?;
        let now = self.clock.now();
        let mut applied = 0;
        for field in self.entity.fields() {
            if self.overrides.contains_key(field.name()) {
                continue;
            }
            let Some(value) = defaults::default_for(field, now) else {
                self.report(DiagnosticEvent::DefaultMissing {
                    field: field.name(),
                    declared: field.field_type().name(),
                });
                continue;
            };
            let rendered = value.to_string();
            instance
                .assign(field.name(), value)
                .map_err(|err| self.creation_error(&err))?;
            self.report(DiagnosticEvent::DefaultApplied {
                field: field.name(),
                value: rendered,
            });
            applied += 1;
        }
        for (field, value) in &self.overrides {
            instance
                .assign(field, value.clone())
                .map_err(|err| self.creation_error(&err.for_field(field)))?;
        }
        self.report(DiagnosticEvent::Built {
            defaults: applied,
            overrides: self.overrides.len(),
        });
        Ok(instance)
    }

    fn reject(&self, field: &str, reason: FieldAccessReason) -> EntityBuilderError {
        let err = EntityBuilderError::FieldAccess {
            field: field.to_owned(),
            entity: self.entity.path().to_owned(),
            reason,
        };
        self.report(DiagnosticEvent::OverrideRejected {
            field: field.to_owned(),
            reason: err.to_string(),
        });
        err
    }

    fn creation_error(&self, cause: &impl fmt::Display) -> EntityBuilderError {
        EntityBuilderError::ObjectCreation {
            entity: self.entity.path().to_owned(),
            reason: cause.to_string(),
        }
    }

    fn report(&self, event: DiagnosticEvent) {
        self.sink.report(&Diagnostic {
            builder: self.id,
            entity: self.entity.path(),
            event,
        });
    }
}

impl<T: Entity> fmt::Debug for EntityBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBuilder")
            .field("id", &self.id)
            .field("entity", &self.entity.path())
            .field("overrides", &self.overrides)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
