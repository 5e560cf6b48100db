//! Free-text funding amount parsing.
//!
//! Sources describe awards as anything from "$5,000 - $10,000" to
//! "Full tuition + stipend" to "varies by department". The parser reads the
//! text into a structured value in strict priority order: full coverage,
//! variable, range, flat number.

use regex::Regex;
use scholarstream_common::ParsedAmount;

/// Phrases indicating total funding rather than a numeric figure.
const FULL_TUITION_PHRASES: &[&str] = &[
    "full tuition",
    "fully funded",
    "full funding",
    "full ride",
    "full scholarship",
    "tuition waiver",
    "all expenses",
];

/// Keywords indicating the amount is not fixed or not published.
const VARIABLE_KEYWORDS: &[&str] = &[
    "varies",
    "variable",
    "tbd",
    "to be determined",
    "contact",
    "depends",
    "negotiable",
    "unspecified",
];

pub struct AmountParser {
    /// Digit groups, optionally comma-separated in triples, optional decimals.
    number: Regex,
    /// Range formatting: number-dash-number, "X to Y", "up to", "between".
    range: Regex,
}

impl AmountParser {
    pub fn new() -> Self {
        Self {
            number: Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?")
                .expect("valid regex"),
            range: Regex::new(
                r"(?i)\d[\d,.]*\s*(?:-|–|—|\bto\b)\s*[$€£¥]?\s*\d|\bup\s+to\b|\bbetween\b",
            )
            .expect("valid regex"),
        }
    }

    pub fn parse(&self, text: Option<&str>) -> ParsedAmount {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return ParsedAmount {
                value: None,
                is_range: false,
                is_full_tuition: false,
                is_variable: false,
                original_text: String::new(),
            };
        };

        let lower = text.to_lowercase();

        // Full coverage wins over any numbers present in the text.
        if FULL_TUITION_PHRASES.iter().any(|p| lower.contains(p)) {
            return ParsedAmount {
                value: None,
                is_range: false,
                is_full_tuition: true,
                is_variable: false,
                original_text: text.to_string(),
            };
        }

        if VARIABLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return ParsedAmount {
                value: None,
                is_range: false,
                is_full_tuition: false,
                is_variable: true,
                original_text: text.to_string(),
            };
        }

        let numbers: Vec<f64> = self
            .number
            .find_iter(text)
            .filter_map(|m| parse_number(m.as_str()))
            .collect();

        if !numbers.is_empty() && self.range.is_match(text) {
            // Max of all tokens; "up to $X" has a single token, which is X.
            let max = numbers.iter().cloned().fold(f64::MIN, f64::max);
            return ParsedAmount {
                value: Some(max),
                is_range: true,
                is_full_tuition: false,
                is_variable: false,
                original_text: text.to_string(),
            };
        }

        ParsedAmount {
            value: numbers.first().copied(),
            is_range: false,
            is_full_tuition: false,
            is_variable: false,
            original_text: text.to_string(),
        }
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> AmountParser {
        AmountParser::new()
    }

    #[test]
    fn dollar_range_takes_the_max() {
        let parsed = parser().parse(Some("$5,000 - $10,000"));
        assert_eq!(parsed.value, Some(10_000.0));
        assert!(parsed.is_range);
        assert!(!parsed.is_full_tuition);
        assert!(!parsed.is_variable);
    }

    #[test]
    fn full_tuition_beats_numbers() {
        let parsed = parser().parse(Some("Full tuition + stipend"));
        assert!(parsed.is_full_tuition);
        assert_eq!(parsed.value, None);

        let parsed = parser().parse(Some("Fully funded, worth $40,000 per year"));
        assert!(parsed.is_full_tuition);
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn variable_keywords() {
        for text in ["Varies by department", "TBD", "Contact the financial aid office"] {
            let parsed = parser().parse(Some(text));
            assert!(parsed.is_variable, "{text}");
            assert_eq!(parsed.value, None);
        }
    }

    #[test]
    fn up_to_single_token_is_the_value() {
        let parsed = parser().parse(Some("up to $7,500"));
        assert_eq!(parsed.value, Some(7_500.0));
        assert!(parsed.is_range);
    }

    #[test]
    fn between_phrase_is_a_range() {
        let parsed = parser().parse(Some("between 1,000 and 3,000 EUR"));
        assert_eq!(parsed.value, Some(3_000.0));
        assert!(parsed.is_range);
    }

    #[test]
    fn x_to_y_is_a_range() {
        let parsed = parser().parse(Some("$2,000 to $4,500 per semester"));
        assert_eq!(parsed.value, Some(4_500.0));
        assert!(parsed.is_range);
    }

    #[test]
    fn flat_amount_takes_first_token() {
        let parsed = parser().parse(Some("$2,500 annual award"));
        assert_eq!(parsed.value, Some(2_500.0));
        assert!(!parsed.is_range);
    }

    #[test]
    fn decimals_and_comma_grouping() {
        let parsed = parser().parse(Some("1,234.56 USD"));
        assert_eq!(parsed.value, Some(1_234.56));
    }

    #[test]
    fn missing_text_is_empty_and_flagless() {
        for input in [None, Some(""), Some("   ")] {
            let parsed = parser().parse(input);
            assert_eq!(parsed.value, None);
            assert!(!parsed.is_range && !parsed.is_full_tuition && !parsed.is_variable);
            assert_eq!(parsed.original_text, "");
        }
    }

    #[test]
    fn non_numeric_text_keeps_original() {
        let parsed = parser().parse(Some("generous award"));
        assert_eq!(parsed.value, None);
        assert!(!parsed.is_range && !parsed.is_full_tuition && !parsed.is_variable);
        assert_eq!(parsed.original_text, "generous award");
    }
}
