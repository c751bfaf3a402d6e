//! Support for generated, strongly typed builders.
//!
//! `entity_builder_codegen` writes one `<Target>Builder` per marked entity.
//! Every generated builder wraps a [`BuilderDelegate`] and implements
//! [`HasBuilder`] for its target, so tests can ask for `builder::<T>()`
//! without naming the generated type.

use std::fmt;
use std::sync::Arc;

use crate::builder::EntityBuilder;
use crate::clock::Clock;
use crate::diagnostics::DiagnosticSink;
use crate::entity::Entity;
use crate::error::EntityBuilderError;
use crate::value::IntoValue;

/// Shared state behind every generated builder.
///
/// Setters on a typed builder cannot fail: their argument types already
/// match the fields. The delegate still records the first error raised by
/// the runtime builder, such as an unusable target, and returns it from
/// every [`BuilderDelegate::build`] call.
pub struct BuilderDelegate<T: Entity> {
    inner: Result<EntityBuilder<T>, EntityBuilderError>,
}

impl<T: Entity> BuilderDelegate<T> {
    /// Binds a runtime builder to `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: EntityBuilder::of(),
        }
    }

    /// Forwards an override, keeping the first error seen.
    #[must_use]
    pub fn with(self, field: &str, value: impl IntoValue) -> Self {
        Self {
            inner: self.inner.and_then(|builder| builder.with(field, value)),
        }
    }

    /// Routes diagnostics to `sink`.
    #[must_use]
    pub fn with_sink(self, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            inner: self.inner.map(|builder| builder.with_sink(sink)),
        }
    }

    /// Fixes the clock used for date defaults.
    #[must_use]
    pub fn with_clock(self, clock: Clock) -> Self {
        Self {
            inner: self.inner.map(|builder| builder.with_clock(clock)),
        }
    }

    /// Builds a new instance, or returns the first recorded error.
    ///
    /// # Errors
    ///
    /// Returns the deferred error from an earlier call, or any error from
    /// [`EntityBuilder::build`].
    pub fn build(&self) -> Result<T, EntityBuilderError> {
        self.inner
            .as_ref()
            .map_err(Clone::clone)
            .and_then(EntityBuilder::build)
    }
}

impl<T: Entity> Default for BuilderDelegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> fmt::Debug for BuilderDelegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderDelegate")
            .field("inner", &self.inner)
            .finish()
    }
}

/// Links an entity to its generated builder.
pub trait HasBuilder: Entity {
    /// The generated `<Target>Builder`.
    type Builder: Default;
}

/// Returns a fresh generated builder for `T`.
///
/// ```rust,ignore
/// let person = entity_builder::builder::<Person>().with_age(30).build()?;
/// ```
#[must_use]
pub fn builder<T: HasBuilder>() -> T::Builder {
    T::Builder::default()
}

/// Includes a generated builder into the current module.
///
/// The generator writes units under `$OUT_DIR/entity_builders/`, mirroring
/// the module path of each target. Name the builder alone for targets at the
/// crate root, or add `in` and the module path for nested targets:
///
/// ```rust,ignore
/// entity_builder::include_builder!(PersonBuilder);
/// entity_builder::include_builder!(ProductBuilder in catalog::items);
/// ```
#[macro_export]
macro_rules! include_builder {
    ($builder:ident) => {
        include!(concat!(
            env!("OUT_DIR"),
            "/entity_builders/",
            stringify!($builder),
            ".rs"
        ));
    };
    ($builder:ident in $($segment:ident)::+) => {
        include!(concat!(
            env!("OUT_DIR"),
            "/entity_builders",
            $("/", stringify!($segment),)+
            "/",
            stringify!($builder),
            ".rs"
        ));
    };
}
