//! Maps raw extracted records onto the canonical schema.
//!
//! Normalization is best-effort everywhere: anything that fails to map is
//! kept (title-cased or verbatim) with a logged warning rather than dropped.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use tracing::warn;

use scholarstream_common::{RawScholarship, Scholarship, StringOrList};

use crate::dates::{parse_deadline, ParsedDeadline};

/// Lowercased alias → canonical country name.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("us", "United States"),
    ("u.s.", "United States"),
    ("u.s.a.", "United States"),
    ("america", "United States"),
    ("united states of america", "United States"),
    ("uk", "United Kingdom"),
    ("u.k.", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("england", "United Kingdom"),
    ("uae", "United Arab Emirates"),
    ("korea", "South Korea"),
    ("south korea", "South Korea"),
    ("republic of korea", "South Korea"),
    ("holland", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("deutschland", "Germany"),
    ("czech republic", "Czechia"),
    ("czechia", "Czechia"),
    ("nz", "New Zealand"),
    ("new zealand", "New Zealand"),
    ("viet nam", "Vietnam"),
    ("prc", "China"),
    ("people's republic of china", "China"),
    ("hong kong sar", "Hong Kong"),
    ("roc", "Taiwan"),
];

/// Lowercased degree fragment → canonical level.
const DEGREE_SYNONYMS: &[(&str, &str)] = &[
    ("bachelor", "Bachelors"),
    ("bachelors", "Bachelors"),
    ("bachelor's", "Bachelors"),
    ("undergraduate", "Bachelors"),
    ("undergrad", "Bachelors"),
    ("bs", "Bachelors"),
    ("ba", "Bachelors"),
    ("bsc", "Bachelors"),
    ("beng", "Bachelors"),
    ("master", "Masters"),
    ("masters", "Masters"),
    ("master's", "Masters"),
    ("graduate", "Masters"),
    ("grad", "Masters"),
    ("ms", "Masters"),
    ("ma", "Masters"),
    ("msc", "Masters"),
    ("meng", "Masters"),
    ("mba", "Masters"),
    ("phd", "PhD"),
    ("ph.d", "PhD"),
    ("ph.d.", "PhD"),
    ("doctorate", "PhD"),
    ("doctoral", "PhD"),
    ("dphil", "PhD"),
    ("postdoc", "Postdoc"),
    ("post-doc", "Postdoc"),
    ("postdoctoral", "Postdoc"),
    ("post-doctoral", "Postdoc"),
];

/// Tracking parameters stripped during link normalization.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_cid",
    "mc_eid",
    "ref",
];

pub struct Normalizer {
    countries: HashMap<&'static str, &'static str>,
    degree_exact: HashMap<&'static str, &'static str>,
    /// Containment fallback entries, longest key first so the most specific
    /// synonym wins deterministically.
    degree_by_len: Vec<(&'static str, &'static str)>,
    degree_split: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        let mut degree_by_len: Vec<_> = DEGREE_SYNONYMS.to_vec();
        degree_by_len.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

        Self {
            countries: COUNTRY_ALIASES.iter().copied().collect(),
            degree_exact: DEGREE_SYNONYMS.iter().copied().collect(),
            degree_by_len,
            degree_split: Regex::new(r"(?i)\s*(?:/|\||&|\band\b|\bor\b)\s*").expect("valid regex"),
        }
    }

    /// Map one raw record onto the canonical schema. Pure apart from
    /// anomaly logging.
    pub fn normalize(&self, raw: &RawScholarship) -> Scholarship {
        Scholarship {
            name: raw.name.trim().to_string(),
            source: raw.source.clone(),
            country: raw
                .country
                .as_ref()
                .map(|c| c.map_each(|v| self.canonical_country(v))),
            degree: raw
                .degree
                .as_ref()
                .map(|d| self.canonical_degrees(d))
                .unwrap_or_default(),
            deadline: raw
                .deadline
                .as_deref()
                .map(|d| self.normalize_deadline(d))
                .unwrap_or_default(),
            link: raw
                .link
                .as_deref()
                .map(|l| self.normalize_link(l))
                .unwrap_or_default(),
            description: raw.description.clone(),
            eligibility: raw.eligibility.clone(),
            amount: raw.amount.clone(),
            scraped_at: Utc::now(),
        }
    }

    fn canonical_country(&self, value: &str) -> String {
        let key = value.trim().to_lowercase();
        match self.countries.get(key.as_str()) {
            Some(canonical) => canonical.to_string(),
            None => title_case(value.trim()),
        }
    }

    /// Split a mixed degree string and map each fragment, collapsing
    /// duplicates. Order of the output set is not guaranteed.
    fn canonical_degrees(&self, degree: &StringOrList) -> Vec<String> {
        let mut levels: Vec<String> = Vec::new();
        for value in degree.iter() {
            for fragment in self.degree_split.split(value) {
                let fragment = fragment.trim();
                if fragment.is_empty() {
                    continue;
                }
                let level = self.map_degree(fragment);
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
        }
        levels
    }

    fn map_degree(&self, fragment: &str) -> String {
        let key = fragment.to_lowercase();
        if let Some(canonical) = self.degree_exact.get(key.as_str()) {
            return canonical.to_string();
        }
        for (synonym, canonical) in &self.degree_by_len {
            if key.contains(synonym) {
                return canonical.to_string();
            }
        }
        warn!(degree = fragment, "Unrecognized degree level, title-casing as-is");
        title_case(fragment)
    }

    fn normalize_deadline(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }
        match parse_deadline(raw) {
            Some(ParsedDeadline::Instant(dt)) => {
                dt.to_rfc3339_opts(SecondsFormat::Millis, true)
            }
            Some(ParsedDeadline::DateOnly(date)) => {
                format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
            }
            None => {
                warn!(deadline = raw, "Unparseable deadline, keeping original text");
                raw.to_string()
            }
        }
    }

    /// Trim, default the scheme to https, validate, and strip tracking
    /// parameters. Invalid URLs are kept (prefixed) rather than rejected.
    fn normalize_link(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        match url::Url::parse(&with_scheme) {
            Ok(parsed) => strip_tracking_params(parsed),
            Err(e) => {
                warn!(link = raw, error = %e, "Invalid URL, keeping as-is");
                with_scheme
            }
        }
    }
}

fn strip_tracking_params(mut parsed: url::Url) -> String {
    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let clean_pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if clean_pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(clean_pairs);
    }

    parsed.to_string()
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawScholarship {
        RawScholarship {
            name: name.to_string(),
            source: "Test Source".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn name_is_trimmed() {
        let n = Normalizer::new();
        let record = n.normalize(&raw("  Gates Scholarship  "));
        assert_eq!(record.name, "Gates Scholarship");
    }

    #[test]
    fn country_aliases_map_case_insensitively() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.country = Some("usa".into());
        assert_eq!(
            n.normalize(&r).country,
            Some(StringOrList::One("United States".to_string()))
        );

        r.country = Some("UK".into());
        assert_eq!(
            n.normalize(&r).country,
            Some(StringOrList::One("United Kingdom".to_string()))
        );
    }

    #[test]
    fn country_lists_map_element_wise() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.country = Some(StringOrList::Many(vec![
            "usa".to_string(),
            "germany".to_string(),
            "uk".to_string(),
        ]));
        assert_eq!(
            n.normalize(&r).country,
            Some(StringOrList::Many(vec![
                "United States".to_string(),
                "Germany".to_string(),
                "United Kingdom".to_string(),
            ]))
        );
    }

    #[test]
    fn unmapped_country_is_title_cased() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.country = Some("burkina faso".into());
        assert_eq!(
            n.normalize(&r).country,
            Some(StringOrList::One("Burkina Faso".to_string()))
        );
    }

    #[test]
    fn mixed_degree_string_splits_and_maps() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.degree = Some("MS/PhD".into());
        let mut degrees = n.normalize(&r).degree;
        degrees.sort();
        assert_eq!(degrees, vec!["Masters".to_string(), "PhD".to_string()]);
    }

    #[test]
    fn degree_separators_and_dedup() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.degree = Some("Masters and PhD | doctorate".into());
        let mut degrees = n.normalize(&r).degree;
        degrees.sort();
        assert_eq!(degrees, vec!["Masters".to_string(), "PhD".to_string()]);
    }

    #[test]
    fn degree_containment_prefers_longest_synonym() {
        let n = Normalizer::new();
        // "postdoctoral" must win over the shorter "doctoral" inside it.
        let mut r = raw("x");
        r.degree = Some("postdoctoral fellowship".into());
        assert_eq!(n.normalize(&r).degree, vec!["Postdoc".to_string()]);
    }

    #[test]
    fn unknown_degree_falls_back_to_title_case() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.degree = Some("vocational".into());
        assert_eq!(n.normalize(&r).degree, vec!["Vocational".to_string()]);
    }

    #[test]
    fn day_first_slash_deadline() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.deadline = Some("31/12/2024".to_string());
        assert_eq!(n.normalize(&r).deadline, "2024-12-31T00:00:00.000Z");
    }

    #[test]
    fn rfc3339_deadline_keeps_the_instant() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.deadline = Some("2026-03-15T12:30:00Z".to_string());
        assert_eq!(n.normalize(&r).deadline, "2026-03-15T12:30:00.000Z");
    }

    #[test]
    fn unparseable_deadline_is_kept_verbatim() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.deadline = Some("rolling admissions".to_string());
        assert_eq!(n.normalize(&r).deadline, "rolling admissions");
    }

    #[test]
    fn bare_link_gets_https_scheme() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.link = Some("scholarships.example.edu/apply".to_string());
        assert_eq!(n.normalize(&r).link, "https://scholarships.example.edu/apply");
    }

    #[test]
    fn tracking_params_are_stripped() {
        let n = Normalizer::new();
        let mut r = raw("x");
        r.link = Some(
            "https://example.org/award?id=7&utm_source=newsletter&fbclid=abc".to_string(),
        );
        assert_eq!(n.normalize(&r).link, "https://example.org/award?id=7");
    }

    #[test]
    fn missing_optionals_become_none_and_empty() {
        let n = Normalizer::new();
        let record = n.normalize(&raw("x"));
        assert_eq!(record.degree, Vec::<String>::new());
        assert_eq!(record.deadline, "");
        assert_eq!(record.link, "");
        assert!(record.country.is_none());
        assert!(record.description.is_none());
        assert!(record.amount.is_none());
    }
}
