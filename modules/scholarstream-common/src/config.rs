use std::env;

/// Retry policy knobs shared by every source in a run.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Max retry count; total attempts = retries + 1.
    pub retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the headless-Chrome rendering service.
    pub headless_url: String,
    pub headless_token: Option<String>,

    /// How many extractors may run at once.
    pub concurrency: usize,
    pub user_agent: String,
    pub retry: RetryConfig,
}

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ScholarstreamBot/0.1; +https://scholarstream.dev)";

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing or malformed —
    /// a bad deployment should fail at startup, not mid-run.
    pub fn from_env() -> Self {
        Self {
            headless_url: required_env("HEADLESS_URL"),
            headless_token: env::var("HEADLESS_TOKEN").ok(),
            concurrency: parsed_env("SCRAPER_CONCURRENCY", 3),
            user_agent: env::var("SCRAPER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            retry: RetryConfig {
                retries: parsed_env("SCRAPER_RETRIES", 3),
                base_delay_ms: parsed_env("SCRAPER_RETRY_BASE_MS", 1_000),
                max_delay_ms: parsed_env("SCRAPER_RETRY_MAX_MS", 10_000),
            },
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number, got {v:?}")),
        Err(_) => default,
    }
}
