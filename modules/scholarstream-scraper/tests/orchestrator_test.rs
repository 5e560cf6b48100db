//! Orchestrator behavior with mock extractors: no network, no browser.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use scholarstream_common::RawScholarship;
use scholarstream_scraper::extract::SourceExtractor;
use scholarstream_scraper::orchestrator::{self, ScraperOrchestrator};
use scholarstream_scraper::retry::RetryPolicy;

fn raw(name: &str, source: &str) -> RawScholarship {
    RawScholarship {
        name: name.to_string(),
        source: source.to_string(),
        deadline: Some("31/12/2026".to_string()),
        link: Some("example.org/apply".to_string()),
        ..Default::default()
    }
}

fn fast_retry(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
    }
}

/// Returns a fixed record list, optionally after a delay.
struct ListSource {
    name: String,
    records: Vec<RawScholarship>,
    delay: Duration,
}

impl ListSource {
    fn new(name: &str, count: usize) -> Self {
        let records = (0..count)
            .map(|i| raw(&format!("{name} award {i}"), name))
            .collect();
        Self {
            name: name.to_string(),
            records,
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SourceExtractor for ListSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self) -> Result<Vec<RawScholarship>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.records.clone())
    }
}

/// Always fails; counts how many attempts the retry handler makes.
struct DeadSource {
    name: String,
    attempts: Arc<AtomicU32>,
}

impl DeadSource {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    fn counter(&self) -> Arc<AtomicU32> {
        self.attempts.clone()
    }
}

#[async_trait]
impl SourceExtractor for DeadSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self) -> Result<Vec<RawScholarship>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        bail!("connection refused")
    }
}

/// Fails the first `fail_first` calls, then succeeds.
struct FlakySource {
    name: String,
    fail_first: u32,
    calls: AtomicU32,
}

impl FlakySource {
    fn new(name: &str, fail_first: u32) -> Self {
        Self {
            name: name.to_string(),
            fail_first,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl SourceExtractor for FlakySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self) -> Result<Vec<RawScholarship>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            bail!("navigation timeout on attempt {n}");
        }
        Ok(vec![raw("flaky award", &self.name)])
    }
}

#[tokio::test(start_paused = true)]
async fn five_sources_two_failing() {
    let extractors: Vec<Box<dyn SourceExtractor>> = vec![
        Box::new(ListSource::new("Alpha", 2)),
        Box::new(DeadSource::new("Beta")),
        Box::new(ListSource::new("Gamma", 3)),
        Box::new(DeadSource::new("Delta")),
        Box::new(ListSource::new("Epsilon", 1)),
    ];

    let orchestrator = ScraperOrchestrator::new(extractors, 2, fast_retry(3));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.successful_sources, 3);
    assert_eq!(summary.failed_sources, 2);
    assert_eq!(summary.success_rate, 60.0);
    assert_eq!(summary.total_scholarships, 6);
    assert_eq!(summary.results.len(), 5);

    let beta = &summary.results[1];
    assert!(!beta.success);
    assert_eq!(beta.count, 0);
    assert!(beta.scholarships.is_empty());
    assert!(beta.error.as_deref().unwrap().contains("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn failing_source_exhausts_all_attempts() {
    let dead = DeadSource::new("Beta");
    let attempts = dead.counter();

    let extractors: Vec<Box<dyn SourceExtractor>> = vec![Box::new(dead)];
    let orchestrator = ScraperOrchestrator::new(extractors, 1, fast_retry(3));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.failed_sources, 1);
    // retries = 3 means 4 attempts total.
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn results_keep_submission_order_despite_completion_order() {
    let extractors: Vec<Box<dyn SourceExtractor>> = vec![
        Box::new(ListSource::new("Slow", 1).with_delay(Duration::from_millis(500))),
        Box::new(ListSource::new("Fast", 1)),
        Box::new(ListSource::new("Medium", 1).with_delay(Duration::from_millis(100))),
    ];

    let orchestrator = ScraperOrchestrator::new(extractors, 3, fast_retry(0));
    let summary = orchestrator.scrape_all().await;

    let order: Vec<&str> = summary.results.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(order, vec!["Slow", "Fast", "Medium"]);
}

#[tokio::test(start_paused = true)]
async fn get_scholarships_skips_failed_sources_and_preserves_order() {
    let extractors: Vec<Box<dyn SourceExtractor>> = vec![
        Box::new(ListSource::new("Alpha", 2)),
        Box::new(DeadSource::new("Beta")),
        Box::new(ListSource::new("Gamma", 1)),
    ];

    let orchestrator = ScraperOrchestrator::new(extractors, 2, fast_retry(1));
    let summary = orchestrator.scrape_all().await;

    let records = orchestrator::get_scholarships(&summary);
    let names: Vec<&str> = records.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha award 0", "Alpha award 1", "Gamma award 0"]);
    assert!(records.iter().all(|s| s.source != "Beta"));
}

#[tokio::test(start_paused = true)]
async fn flaky_source_recovers_within_retry_budget() {
    let extractors: Vec<Box<dyn SourceExtractor>> =
        vec![Box::new(FlakySource::new("Wobbly", 2))];

    let orchestrator = ScraperOrchestrator::new(extractors, 1, fast_retry(3));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.successful_sources, 1);
    assert_eq!(summary.total_scholarships, 1);
}

#[tokio::test(start_paused = true)]
async fn flaky_source_beyond_budget_reports_last_error() {
    let extractors: Vec<Box<dyn SourceExtractor>> =
        vec![Box::new(FlakySource::new("Wobbly", 5))];

    let orchestrator = ScraperOrchestrator::new(extractors, 1, fast_retry(1));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.failed_sources, 1);
    let error = summary.results[0].error.as_deref().unwrap();
    assert_eq!(error, "navigation timeout on attempt 2");
}

#[tokio::test(start_paused = true)]
async fn raw_records_are_normalized_before_storage() {
    let extractors: Vec<Box<dyn SourceExtractor>> = vec![Box::new(ListSource::new("Alpha", 1))];

    let orchestrator = ScraperOrchestrator::new(extractors, 1, fast_retry(0));
    let summary = orchestrator.scrape_all().await;

    let record = &summary.results[0].scholarships[0];
    assert_eq!(record.deadline, "2026-12-31T00:00:00.000Z");
    assert_eq!(record.link, "https://example.org/apply");
}

#[tokio::test(start_paused = true)]
async fn all_sources_failing_still_returns_a_summary() {
    let extractors: Vec<Box<dyn SourceExtractor>> = vec![
        Box::new(DeadSource::new("Beta")),
        Box::new(DeadSource::new("Delta")),
    ];

    let orchestrator = ScraperOrchestrator::new(extractors, 3, fast_retry(0));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.successful_sources, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert!(orchestrator::get_scholarships(&summary).is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_source_list_yields_an_empty_summary() {
    let orchestrator = ScraperOrchestrator::new(Vec::new(), 3, fast_retry(0));
    let summary = orchestrator.scrape_all().await;

    assert_eq!(summary.results.len(), 0);
    assert_eq!(summary.success_rate, 0.0);
    assert_eq!(summary.total_scholarships, 0);
}
