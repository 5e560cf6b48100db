pub mod error;

pub use error::{HeadlessError, Result};

use std::time::Duration;

/// Client for a Browserless-style headless Chrome service.
///
/// Every navigation is a single request/response pair — the service opens a
/// page, renders it, and tears it down server-side before replying. A failed
/// extraction can never leak a browser session on our end.
pub struct HeadlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HeadlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch fully-rendered HTML for a URL via the /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        self.render(serde_json::json!({ "url": url })).await
    }

    /// Fetch rendered HTML with an explicit settle delay after navigation.
    /// SPA portals often finish their XHR population well after load, so
    /// callers pass the wait the source needs rather than a global default.
    pub async fn content_with_wait(&self, url: &str, wait_ms: u64) -> Result<String> {
        self.render(serde_json::json!({
            "url": url,
            "gotoOptions": { "waitUntil": "networkidle2" },
            "waitForTimeout": wait_ms,
        }))
        .await
    }

    async fn render(&self, body: serde_json::Value) -> Result<String> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(HeadlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}
