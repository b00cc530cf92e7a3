//! Timestamps carried by JSON lines

use chrono::{DateTime, SecondsFormat, Utc};

/// Fractional-second precision of the `timestamp` field
///
/// Both forms are UTC with a `Z` suffix, e.g. `2025-01-08T10:30:45.123Z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    #[default]
    Millis,
    Micros,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        let precision = match self {
            TimestampFormat::Millis => SecondsFormat::Millis,
            TimestampFormat::Micros => SecondsFormat::Micros,
        };
        at.to_rfc3339_opts(precision, true)
    }
}
