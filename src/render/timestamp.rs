//! Timestamp conversion from the datalogger's wire format to display time.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

/// Format the datalogger API sends, e.g. `2024-03-01T10:00:00+02:00`.
pub const SOURCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format shown on the dashboard.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timestamp '{raw}' does not match %Y-%m-%dT%H:%M:%S%z: {reason}")]
pub struct TimestampError {
    pub raw: String,
    pub reason: String,
}

/// Parse a wire timestamp into an instant in the display timezone.
///
/// # Errors
///
/// Returns `TimestampError` if `raw` is not exactly in [`SOURCE_FORMAT`].
pub fn parse(raw: &str, tz: Tz) -> Result<DateTime<Tz>, TimestampError> {
    DateTime::<FixedOffset>::parse_from_str(raw, SOURCE_FORMAT)
        .map(|dt| dt.with_timezone(&tz))
        .map_err(|e| TimestampError {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Reformat a wire timestamp as local display time.
///
/// # Errors
///
/// Returns `TimestampError` if `raw` is not exactly in [`SOURCE_FORMAT`].
pub fn normalize(raw: &str, tz: Tz) -> Result<String, TimestampError> {
    parse(raw, tz).map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}
