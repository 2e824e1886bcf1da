//! Value recoding between form selectors and wire tokens.
//!
//! Every function here is total: unrecognized input maps to a default or
//! passes through, it never fails. Rejecting missing values is the
//! validator's job.

use crate::domain::form::{CATEGORIES, Priority};
use crate::domain::profile::{CategoryCoding, PriorityCoding};
use time::{OffsetDateTime, UtcOffset};

const GENERAL_CATEGORY: &str = "general";

/// Maps a priority token to its coded form. Unknown tokens code as `Medium`.
#[must_use]
pub fn map_priority(token: &str, coding: PriorityCoding) -> &'static str {
    let priority = Priority::from_token(token).unwrap_or(Priority::Medium);
    match (coding, priority) {
        (PriorityCoding::Numbered, Priority::Critical) => "P1",
        (PriorityCoding::Numbered, Priority::High) => "P2",
        (PriorityCoding::Numbered, Priority::Medium) => "P3",
        (PriorityCoding::Numbered, Priority::Low) => "P4",
        (PriorityCoding::Named, Priority::Critical) => "priority_critical",
        (PriorityCoding::Named, Priority::High) => "priority_high",
        (PriorityCoding::Named, Priority::Medium) => "priority_medium",
        (PriorityCoding::Named, Priority::Low) => "priority_low",
        (PriorityCoding::Severity, Priority::Critical) => "sev_critical",
        (PriorityCoding::Severity, Priority::High) => "sev_high",
        (PriorityCoding::Severity, Priority::Medium) => "sev_medium",
        (PriorityCoding::Severity, Priority::Low) => "sev_low",
    }
}

fn slug(token: &str) -> String {
    token.to_lowercase().replace(' ', "_")
}

/// Maps a category token to its coded form. Blank input, and anything outside
/// the table under [`CategoryCoding::Table`], codes as `general`.
#[must_use]
pub fn map_category(token: &str, coding: CategoryCoding) -> String {
    if token.trim().is_empty() {
        return GENERAL_CATEGORY.to_string();
    }
    match coding {
        CategoryCoding::Slug => slug(token),
        CategoryCoding::Table => CATEGORIES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(token))
            .map_or_else(|| GENERAL_CATEGORY.to_string(), |known| slug(known)),
    }
}

/// Normalizes 10-digit and `1`-prefixed 11-digit numbers to E.164.
/// Anything else is returned unchanged.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("+1{digits}"),
        11 if digits.starts_with('1') => format!("+{digits}"),
        _ => raw.to_string(),
    }
}

/// Renders an instant as UTC, `yyyy-MM-ddTHH:mm:ssZ`.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}
