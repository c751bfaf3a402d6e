//! Diagnostics channel injected into each runtime builder.
//!
//! The builder never logs on its own. It reports [`Diagnostic`] events to a
//! [`DiagnosticSink`], and [`TracingSink`], the default, forwards them to
//! `tracing` so verbosity stays under the application's subscriber.

use std::fmt;

use crate::builder::BuilderId;

/// Receives builder diagnostics.
///
/// The trait is object safe so builders can hold it as
/// `Arc<dyn DiagnosticSink>`.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one event.
    fn report(&self, diagnostic: &Diagnostic);
}

/// One event emitted by a runtime builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Builder that emitted the event.
    pub builder: BuilderId,
    /// Fully qualified name of the builder's target type.
    pub entity: &'static str,
    /// What happened.
    pub event: DiagnosticEvent,
}

/// What a [`Diagnostic`] reports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticEvent {
    /// A builder was bound to its target type.
    Created,
    /// A `with` call passed validation.
    OverrideAccepted {
        /// Field named by the caller.
        field: String,
        /// Rendered value.
        value: String,
    },
    /// A `with` call failed validation.
    OverrideRejected {
        /// Field named by the caller.
        field: String,
        /// Rendered error.
        reason: String,
    },
    /// A policy default was stored into a field.
    DefaultApplied {
        /// Field that received the default.
        field: &'static str,
        /// Rendered default.
        value: String,
    },
    /// No default exists for the field's type; it keeps its constructed value.
    DefaultMissing {
        /// Field left untouched.
        field: &'static str,
        /// Declared type of the field.
        declared: String,
    },
    /// `build()` returned an instance.
    Built {
        /// Number of fields filled from the policy.
        defaults: usize,
        /// Number of overrides applied.
        overrides: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.builder, self.entity)?;
        match &self.event {
            DiagnosticEvent::Created => f.write_str("builder created"),
            DiagnosticEvent::OverrideAccepted { field, value } => {
                write!(f, "override {field} = {value}")
            }
            DiagnosticEvent::OverrideRejected { field, reason } => {
                write!(f, "override {field} rejected: {reason}")
            }
            DiagnosticEvent::DefaultApplied { field, value } => {
                write!(f, "default {field} = {value}")
            }
            DiagnosticEvent::DefaultMissing { field, declared } => {
                write!(f, "no default for {field} of type {declared}")
            }
            DiagnosticEvent::Built {
                defaults,
                overrides,
            } => write!(f, "built with {defaults} defaults and {overrides} overrides"),
        }
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        let builder = diagnostic.builder;
        let entity = diagnostic.entity;
        match &diagnostic.event {
            DiagnosticEvent::Created => {
                tracing::debug!(%builder, entity, "created entity builder");
            }
            DiagnosticEvent::OverrideAccepted { field, value } => {
                tracing::trace!(%builder, entity, %field, %value, "accepted override");
            }
            DiagnosticEvent::OverrideRejected { field, reason } => {
                tracing::error!(%builder, entity, %field, %reason, "rejected override");
            }
            DiagnosticEvent::DefaultApplied { field, value } => {
                tracing::trace!(%builder, entity, field, %value, "applied default value");
            }
            DiagnosticEvent::DefaultMissing { field, declared } => {
                tracing::warn!(
                    %builder,
                    entity,
                    field,
                    %declared,
                    "no default value for field type; leaving it unset"
                );
            }
            DiagnosticEvent::Built {
                defaults,
                overrides,
            } => {
                tracing::info!(%builder, entity, defaults, overrides, "built entity");
            }
        }
    }
}
