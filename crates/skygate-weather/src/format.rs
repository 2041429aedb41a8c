//! Display formatting for temperatures and observation dates.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, Serializer};

const KELVIN_OFFSET: f64 = 273.15;

/// Default calendar-date pattern (en-US short date, e.g. `11/14/2023`)
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Temperature in degrees Celsius.
///
/// Holds the exact `kelvin - 273.15` difference; [`value`](Self::value) and
/// the `Display` impl both round to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celsius(f64);

impl Celsius {
    pub fn from_kelvin(kelvin: f64) -> Self {
        Self(kelvin - KELVIN_OFFSET)
    }

    /// Rounded to 2 decimal places
    pub fn value(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }
}

impl std::fmt::Display for Celsius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}°C", self.value())
    }
}

impl Serialize for Celsius {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Local,
    Utc,
}

/// Turns Unix-second timestamps into calendar-date strings
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
    zone: Zone,
}

impl DateFormatter {
    /// Format in the machine's local time zone.
    ///
    /// An unusable pattern falls back to [`DEFAULT_DATE_FORMAT`].
    pub fn local(pattern: &str) -> Self {
        Self::new(pattern, Zone::Local)
    }

    pub fn utc(pattern: &str) -> Self {
        Self::new(pattern, Zone::Utc)
    }

    fn new(pattern: &str, zone: Zone) -> Self {
        let pattern = if is_valid_pattern(pattern) {
            pattern.to_string()
        } else {
            tracing::warn!(
                "Invalid date format {:?}, using {:?}",
                pattern,
                DEFAULT_DATE_FORMAT
            );
            DEFAULT_DATE_FORMAT.to_string()
        };
        Self { pattern, zone }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `None` when the timestamp is outside chrono's representable range.
    pub fn format(&self, timestamp_secs: i64) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp(timestamp_secs, 0)?;
        let text = match self.zone {
            Zone::Local => utc.with_timezone(&Local).format(&self.pattern).to_string(),
            Zone::Utc => utc.format(&self.pattern).to_string(),
        };
        Some(text)
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::local(DEFAULT_DATE_FORMAT)
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.trim().is_empty() && !StrftimeItems::new(pattern).any(|item| item == Item::Error)
}
