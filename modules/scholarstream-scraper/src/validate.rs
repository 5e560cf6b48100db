//! Schema validation over canonical records.
//!
//! Findings are structured data, not errors — callers decide policy. A
//! record is valid iff it has zero errors; warnings flag values worth
//! truncating but never block.

use regex::Regex;

use scholarstream_common::{
    Scholarship, Severity, ValidationIssue, ValidationResult, ValidationWarning,
};

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 200;
const SOURCE_MIN: usize = 2;
const DESCRIPTION_MAX: usize = 2_000;
const ELIGIBILITY_MAX: usize = 1_000;

pub struct Validator {
    link_shape: Regex,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            link_shape: Regex::new(r"^https?://\S+\.\S+").expect("valid regex"),
        }
    }

    pub fn validate(&self, record: &Scholarship) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Required fields. A missing field short-circuits its other checks.
        if record.name.trim().is_empty() {
            critical(&mut result, "name", "name is required");
        } else {
            if record.name.len() < NAME_MIN {
                major(
                    &mut result,
                    "name",
                    &format!("name shorter than {NAME_MIN} characters"),
                );
            }
            if record.name.len() > NAME_MAX {
                truncation_warning(&mut result, "name", NAME_MAX);
            }
        }

        if record.source.trim().is_empty() {
            critical(&mut result, "source", "source is required");
        } else if record.source.len() < SOURCE_MIN {
            major(
                &mut result,
                "source",
                &format!("source shorter than {SOURCE_MIN} characters"),
            );
        }

        if record.link.trim().is_empty() {
            critical(&mut result, "link", "link is required");
        } else if !self.link_shape.is_match(&record.link) {
            major(&mut result, "link", "link is not an absolute http(s) URL");
        }

        if let Some(description) = &record.description {
            if description.len() > DESCRIPTION_MAX {
                truncation_warning(&mut result, "description", DESCRIPTION_MAX);
            }
        }
        if let Some(eligibility) = &record.eligibility {
            if eligibility.len() > ELIGIBILITY_MAX {
                truncation_warning(&mut result, "eligibility", ELIGIBILITY_MAX);
            }
        }

        result
    }

    /// Validate each record independently; one record's failure never
    /// affects another's result.
    pub fn validate_batch(&self, records: &[Scholarship]) -> Vec<ValidationResult> {
        records.iter().map(|r| self.validate(r)).collect()
    }
}

fn critical(result: &mut ValidationResult, field: &str, message: &str) {
    result.errors.push(ValidationIssue {
        field: field.to_string(),
        message: message.to_string(),
        severity: Severity::Critical,
    });
}

fn major(result: &mut ValidationResult, field: &str, message: &str) {
    result.errors.push(ValidationIssue {
        field: field.to_string(),
        message: message.to_string(),
        severity: Severity::Major,
    });
}

fn truncation_warning(result: &mut ValidationResult, field: &str, max: usize) {
    result.warnings.push(ValidationWarning {
        field: field.to_string(),
        message: format!("{field} exceeds {max} characters"),
        suggestion: Some(format!("truncate to {max} characters")),
    });
}
