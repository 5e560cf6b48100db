use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scholarstream_common::Config;
use scholarstream_scraper::filter::{self, ScholarshipQuery};
use scholarstream_scraper::orchestrator::{self, ScraperOrchestrator};
use scholarstream_scraper::sources;
use scholarstream_scraper::validate::Validator;

/// Aggregate scholarship listings from the configured sources and print the
/// filtered, normalized record set as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "scholarstream")]
struct Args {
    /// Filter by country (case-insensitive substring).
    #[arg(long)]
    country: Option<String>,

    /// Filter by degree level (case-insensitive substring).
    #[arg(long)]
    degree: Option<String>,

    /// Max results to print (clamped to 1..=100, default 50).
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("scholarstream_scraper=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let extractors = sources::build_extractors(&config);
    info!(sources = extractors.len(), "Scholarstream starting");

    let orchestrator =
        ScraperOrchestrator::new(extractors, config.concurrency, config.retry.into());
    let summary = orchestrator.scrape_all().await;
    info!("{summary}");

    let validator = Validator::new();
    let mut records = filter::dedup_scholarships(orchestrator::get_scholarships(&summary));
    records.retain(|s| {
        let report = validator.validate(s);
        for issue in &report.errors {
            warn!(name = %s.name, field = %issue.field, issue = %issue.message, "dropping invalid record");
        }
        report.is_valid()
    });
    let query = ScholarshipQuery {
        country: args.country,
        degree: args.degree,
        limit: args.limit,
    };

    for scholarship in filter::apply(&query, &records) {
        println!("{}", serde_json::to_string(&scholarship)?);
    }

    Ok(())
}
