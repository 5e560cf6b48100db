use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScholarstreamError {
    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("HTTP error (status {status}) from {url}")]
    Http { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
