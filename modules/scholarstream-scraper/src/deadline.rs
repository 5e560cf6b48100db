//! Day-offset and urgency math over free-text deadlines.

use chrono::{Local, NaiveDate};
use scholarstream_common::Urgency;

use crate::dates::{parse_deadline, ParsedDeadline};

/// Whole days from today until the deadline. Both ends are truncated to
/// local midnight, so the count is unaffected by time-of-day; a deadline
/// falling today is 0. Unparseable input returns None, never an error.
pub fn days_until(deadline: &str) -> Option<i64> {
    let date = deadline_date(deadline)?;
    let today = Local::now().date_naive();
    Some((date - today).num_days())
}

/// True iff the deadline parses, has not passed, and is at most `days` away.
pub fn is_within_days(deadline: &str, days: i64) -> bool {
    matches!(days_until(deadline), Some(d) if d >= 0 && d <= days)
}

/// Bucket a deadline by how soon it is. Past or unparseable deadlines get
/// no urgency.
pub fn categorize_urgency(deadline: &str) -> Urgency {
    match days_until(deadline) {
        Some(d) if d < 0 => Urgency::None,
        Some(d) if d <= 30 => Urgency::Urgent,
        Some(d) if d <= 60 => Urgency::Soon,
        Some(d) if d <= 90 => Urgency::Later,
        _ => Urgency::None,
    }
}

fn deadline_date(deadline: &str) -> Option<NaiveDate> {
    match parse_deadline(deadline)? {
        ParsedDeadline::Instant(dt) => Some(dt.with_timezone(&Local).date_naive()),
        ParsedDeadline::DateOnly(date) => Some(date),
    }
}
