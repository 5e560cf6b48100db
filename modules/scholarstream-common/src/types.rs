use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field that arrives from a source as either a single string or a list.
/// Raw listing feeds are inconsistent about this, so we model both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// Iterate over the contained values, one or many.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            StringOrList::One(s) => Box::new(std::iter::once(s.as_str())),
            StringOrList::Many(v) => Box::new(v.iter().map(String::as_str)),
        }
    }

    /// Map each value through `f`, preserving shape and ordering.
    pub fn map_each(&self, f: impl Fn(&str) -> String) -> StringOrList {
        match self {
            StringOrList::One(s) => StringOrList::One(f(s)),
            StringOrList::Many(v) => StringOrList::Many(v.iter().map(|s| f(s)).collect()),
        }
    }

    /// Case-insensitive substring match against any contained value.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.iter().any(|v| v.to_lowercase().contains(&needle))
    }
}

impl From<&str> for StringOrList {
    fn from(s: &str) -> Self {
        StringOrList::One(s.to_string())
    }
}

impl From<String> for StringOrList {
    fn from(s: String) -> Self {
        StringOrList::One(s)
    }
}

/// A listing exactly as an extractor pulled it off a source page.
/// Loosely typed; fields may be missing or malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScholarship {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub country: Option<StringOrList>,
    #[serde(default)]
    pub degree: Option<StringOrList>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// A scholarship listing after normalization into the common schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
    pub name: String,
    pub source: String,
    pub country: Option<StringOrList>,
    /// Deduplicated canonical levels (Bachelors/Masters/PhD/Postdoc),
    /// title-cased fallback for anything the synonym table misses.
    pub degree: Vec<String>,
    /// RFC 3339 when parseable, otherwise the original source text.
    pub deadline: String,
    pub link: String,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub amount: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// Structured reading of a free-text funding amount.
/// Exactly one of full-tuition / variable / numeric / null holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAmount {
    pub value: Option<f64>,
    pub is_range: bool,
    pub is_full_tuition: bool,
    pub is_variable: bool,
    pub original_text: String,
}

/// Coarse deadline bucket derived from days-until.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Soon,
    Later,
    None,
}

/// Per-source outcome for one orchestration run. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceResult {
    pub source: String,
    pub scholarships: Vec<Scholarship>,
    pub count: usize,
    pub processing_time_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

/// Run-level aggregate over all sources, in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub total_scholarships: usize,
    pub successful_sources: usize,
    pub failed_sources: usize,
    pub total_processing_time_ms: u64,
    /// successful / total × 100.
    pub success_rate: f64,
    pub results: Vec<SourceResult>,
}

impl std::fmt::Display for ScrapeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Scrape Run Complete ===")?;
        writeln!(f, "Scholarships:   {}", self.total_scholarships)?;
        writeln!(f, "Sources ok:     {}", self.successful_sources)?;
        writeln!(f, "Sources failed: {}", self.failed_sources)?;
        writeln!(f, "Success rate:   {:.1}%", self.success_rate)?;
        writeln!(f, "Total time:     {} ms", self.total_processing_time_ms)?;
        writeln!(f, "\nBy source:")?;
        for r in &self.results {
            if r.success {
                writeln!(f, "  {}: {} records in {} ms", r.source, r.count, r.processing_time_ms)?;
            } else {
                writeln!(
                    f,
                    "  {}: FAILED ({})",
                    r.source,
                    r.error.as_deref().unwrap_or("unknown error")
                )?;
            }
        }
        Ok(())
    }
}

/// How bad a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Outcome of validating one record. Warnings never affect validity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
