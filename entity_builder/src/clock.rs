//! Build-time clock used for date and date-time defaults.

use chrono::{Local, NaiveDateTime};

/// Source of "now" for date and date-time defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The local wall clock, read once per build.
    #[default]
    System,
    /// A fixed instant, for deterministic fixtures.
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Reads the clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Local::now().naive_local(),
            Self::Fixed(instant) => *instant,
        }
    }
}
