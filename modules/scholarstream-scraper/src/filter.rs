//! Query-time filtering over the normalized record set.
//!
//! Filtering happens after extraction, never pushed down into it.

use std::collections::HashSet;

use scholarstream_common::Scholarship;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 100;

/// A client query: optional country and degree needles plus a result cap.
#[derive(Debug, Clone, Default)]
pub struct ScholarshipQuery {
    pub country: Option<String>,
    pub degree: Option<String>,
    pub limit: Option<usize>,
}

/// Apply a query: case-insensitive substring match against any element of
/// multi-valued fields, then cap results at the clamped limit.
pub fn apply(query: &ScholarshipQuery, records: &[Scholarship]) -> Vec<Scholarship> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    records
        .iter()
        .filter(|r| matches_country(query, r) && matches_degree(query, r))
        .take(limit)
        .cloned()
        .collect()
}

fn matches_country(query: &ScholarshipQuery, record: &Scholarship) -> bool {
    match &query.country {
        Some(needle) => record
            .country
            .as_ref()
            .is_some_and(|c| c.contains_ignore_case(needle)),
        None => true,
    }
}

fn matches_degree(query: &ScholarshipQuery, record: &Scholarship) -> bool {
    match &query.degree {
        Some(needle) => {
            let needle = needle.to_lowercase();
            record
                .degree
                .iter()
                .any(|d| d.to_lowercase().contains(&needle))
        }
        None => true,
    }
}

/// Collapse listings scraped from more than one source by normalized
/// (name, link) identity, keeping the first occurrence.
pub fn dedup_scholarships(records: Vec<Scholarship>) -> Vec<Scholarship> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.name.trim().to_lowercase(), r.link.clone())))
        .collect()
}
