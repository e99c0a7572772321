/// Utility functions for timestamp parsing and label formatting
use time::format_description::well_known::Rfc3339;
use time::{format_description, OffsetDateTime, PrimitiveDateTime};

/// Parse an ISO-ish timestamp string.
///
/// Accepts RFC 3339 ("2024-01-01T10:00:00Z") as the primary form, then two
/// lenient fallbacks without a zone offset ("2024-01-01T10:00:00" and
/// "2024-01-01 10:00:00"), which are assumed UTC. Returns None when nothing
/// matches; callers drop such records.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }

    for pattern in [
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
        "[year]-[month]-[day] [hour]:[minute]:[second]",
    ] {
        let format = format_description::parse(pattern)
            .expect("Failed to create format description");
        if let Ok(dt) = PrimitiveDateTime::parse(raw, &format) {
            return Some(dt.assume_utc());
        }
    }

    None
}

/// Format a timestamp for human-readable logging and export rows
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format (UTC).
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Format a timestamp as the short HH:MM:SS label used on chart axes.
pub fn format_time_label(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// HH:MM:SS label for the current wall-clock time.
pub fn now_time_label() -> String {
    format_time_label(&OffsetDateTime::now_utc())
}
