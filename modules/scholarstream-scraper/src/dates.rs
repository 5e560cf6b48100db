//! Shared deadline parse chain used by the normalizer and the deadline
//! calculator. Sources publish deadlines in anything from strict RFC 3339 to
//! "March 15, 2026", so parsing is best-effort and never an error.

use chrono::{DateTime, FixedOffset, NaiveDate};

pub(crate) enum ParsedDeadline {
    /// A full timestamp with an offset. The instant is preserved.
    Instant(DateTime<FixedOffset>),
    /// A bare calendar date, interpreted at midnight.
    DateOnly(NaiveDate),
}

/// Attempt, in order: strict RFC 3339, explicit numeric patterns
/// (`MM/DD/YYYY`, `MM-DD-YYYY`, `YYYY-MM-DD`), then a small set of lenient
/// textual formats. Returns None when nothing matches.
pub(crate) fn parse_deadline(text: &str) -> Option<ParsedDeadline> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedDeadline::Instant(dt));
    }

    if let Some(date) = parse_numeric_date(text) {
        return Some(ParsedDeadline::DateOnly(date));
    }

    parse_lenient(text)
}

/// Numeric dates split by `/` or `-`, disambiguated by digit-group length.
/// A four-digit first group is year-first; otherwise the year is last and a
/// first group above 12 is read day-first (e.g. `31/12/2024`).
fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let sep = if text.contains('/') {
        '/'
    } else if text.contains('-') {
        '-'
    } else {
        return None;
    };

    let parts: Vec<&str> = text.split(sep).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let nums: Vec<u32> = parts.iter().map(|p| p.parse().ok()).collect::<Option<_>>()?;

    if parts[0].len() == 4 {
        return NaiveDate::from_ymd_opt(nums[0] as i32, nums[1], nums[2]);
    }
    if parts[2].len() == 4 {
        let (month, day) = if nums[0] > 12 {
            (nums[1], nums[0])
        } else {
            (nums[0], nums[1])
        };
        return NaiveDate::from_ymd_opt(nums[2] as i32, month, day);
    }
    None
}

const LENIENT_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y", "%B %d %Y"];

fn parse_lenient(text: &str) -> Option<ParsedDeadline> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(ParsedDeadline::Instant(dt));
    }
    for fmt in LENIENT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(ParsedDeadline::DateOnly(date));
        }
    }
    None
}
