//! Conversions between server field representations and form inputs.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use curator_core::{AppError, AppResult};

/// Format produced for `datetime-local` style inputs.
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const LOCAL_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Converts a server RFC 3339 timestamp into an input-friendly UTC string.
///
/// Values that are not RFC 3339 are returned trimmed so the user can still
/// see and correct them.
#[must_use]
pub fn rfc3339_to_local_input(value: &str) -> String {
    let trimmed = value.trim();
    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format(LOCAL_INPUT_FORMAT)
            .to_string(),
        Err(_) => trimmed.to_owned(),
    }
}

/// Converts an input string back into an RFC 3339 UTC timestamp.
///
/// Returns `None` for blank input.
pub fn local_input_to_rfc3339(field: &str, value: &str) -> AppResult<Option<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(
            parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }

    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| {
            Some(
                naive
                    .and_utc()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            )
        })
        .ok_or_else(|| {
            AppError::Validation(format!(
                "{field} must be a date and time like 2026-01-31T18:30"
            ))
        })
}

/// Joins list items into one line per item for text-area editing.
#[must_use]
pub fn join_list(items: &[String]) -> String {
    items.join("\n")
}

/// Splits text-area content on newlines and commas, dropping blanks.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(['\n', ','])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Normalizes an enum-like code: trimmed and uppercased.
#[must_use]
pub fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}
