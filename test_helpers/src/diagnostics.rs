//! A diagnostics sink that keeps every event for later inspection.
//!
//! # Examples
//!
//! ```
//! use entity_builder::{Entity, EntityBuilder};
//! use test_helpers::diagnostics::RecordingSink;
//!
//! #[derive(Debug, Clone, Default, Entity)]
//! struct Note {
//!     body: String,
//! }
//!
//! let sink = RecordingSink::new();
//! let builder = EntityBuilder::<Note>::of()
//!     .expect("acyclic entity")
//!     .with_sink(sink.clone());
//! builder.build().expect("build note");
//! assert!(sink.events().len() >= 2);
//! ```

use std::sync::Arc;

use entity_builder::{Diagnostic, DiagnosticEvent, DiagnosticSink};
use parking_lot::Mutex;

/// Stores diagnostics in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Creates an empty sink ready to hand to a builder.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every diagnostic reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen.lock().clone()
    }

    /// The events of every diagnostic reported so far.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.seen
            .lock()
            .iter()
            .map(|diagnostic| diagnostic.event.clone())
            .collect()
    }

    /// Fields reported as having no default, in report order.
    #[must_use]
    pub fn missing_defaults(&self) -> Vec<&'static str> {
        self.seen
            .lock()
            .iter()
            .filter_map(|diagnostic| match diagnostic.event {
                DiagnosticEvent::DefaultMissing { field, .. } => Some(field),
                _ => None,
            })
            .collect()
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.seen.lock().push(diagnostic.clone());
    }
}
