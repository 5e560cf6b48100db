//! Runs every source extractor under a bounded admission pool, isolates
//! per-source failures, and reduces the raw output into a run summary.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use scholarstream_common::{Scholarship, ScrapeSummary, SourceResult};

use crate::extract::SourceExtractor;
use crate::normalize::Normalizer;
use crate::retry::{execute_with_retry_observed, RetryPolicy};

pub struct ScraperOrchestrator {
    extractors: Vec<Box<dyn SourceExtractor>>,
    concurrency: usize,
    retry: RetryPolicy,
    normalizer: Normalizer,
}

impl ScraperOrchestrator {
    pub fn new(
        extractors: Vec<Box<dyn SourceExtractor>>,
        concurrency: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            extractors,
            concurrency: concurrency.max(1),
            retry,
            normalizer: Normalizer::new(),
        }
    }

    /// Run every extractor, at most `concurrency` in flight at a time.
    /// Excess sources queue in submission order; results are collected in
    /// submission order regardless of completion order. No extractor error
    /// escapes this call — failures become per-source results.
    pub async fn scrape_all(&self) -> ScrapeSummary {
        let run_start = Instant::now();
        info!(
            sources = self.extractors.len(),
            concurrency = self.concurrency,
            "Scrape run starting"
        );

        let results: Vec<SourceResult> = stream::iter(self.extractors.iter())
            .map(|extractor| self.run_source(extractor.as_ref()))
            .buffered(self.concurrency)
            .collect()
            .await;

        let successful_sources = results.iter().filter(|r| r.success).count();
        let failed_sources = results.len() - successful_sources;
        let total_scholarships = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.count)
            .sum();
        let success_rate = if results.is_empty() {
            0.0
        } else {
            successful_sources as f64 / results.len() as f64 * 100.0
        };
        let total_processing_time_ms = run_start.elapsed().as_millis() as u64;

        info!(
            total_scholarships,
            successful_sources,
            failed_sources,
            elapsed_ms = total_processing_time_ms,
            "Scrape run complete"
        );

        ScrapeSummary {
            total_scholarships,
            successful_sources,
            failed_sources,
            total_processing_time_ms,
            success_rate,
            results,
        }
    }

    async fn run_source(&self, extractor: &dyn SourceExtractor) -> SourceResult {
        let source = extractor.name().to_string();
        let start = Instant::now();
        info!(source = source.as_str(), "Source scrape starting");

        let outcome = execute_with_retry_observed(
            &self.retry,
            || extractor.scrape(),
            |attempt, err| {
                warn!(
                    source = source.as_str(),
                    attempt,
                    error = %err,
                    "Source attempt failed, retrying"
                );
            },
        )
        .await;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(raw) => {
                let scholarships: Vec<Scholarship> =
                    raw.iter().map(|r| self.normalizer.normalize(r)).collect();
                info!(
                    source = source.as_str(),
                    count = scholarships.len(),
                    elapsed_ms = processing_time_ms,
                    "Source scrape complete"
                );
                SourceResult {
                    source,
                    count: scholarships.len(),
                    scholarships,
                    processing_time_ms,
                    success: true,
                    error: None,
                }
            }
            Err(err) => {
                warn!(
                    source = source.as_str(),
                    elapsed_ms = processing_time_ms,
                    error = %err,
                    "Source failed after exhausting retries"
                );
                SourceResult {
                    source,
                    scholarships: Vec::new(),
                    count: 0,
                    processing_time_ms,
                    success: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Flatten the normalized records of successful sources, preserving source
/// submission order, then within-source extraction order.
pub fn get_scholarships(summary: &ScrapeSummary) -> Vec<Scholarship> {
    summary
        .results
        .iter()
        .filter(|r| r.success)
        .flat_map(|r| r.scholarships.iter().cloned())
        .collect()
}
