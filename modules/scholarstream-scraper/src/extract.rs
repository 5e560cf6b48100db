//! Source extractors.
//!
//! Each extractor knows how to pull raw listings off one source. Static
//! sources are a single fetch and markup parse; dynamic sources drive the
//! headless rendering service across sections and paginated views. The
//! orchestrator depends only on the [`SourceExtractor`] contract.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use headless_client::HeadlessClient;
use scholarstream_common::{RawScholarship, ScholarstreamError};

use crate::rate_limit::RateLimiter;
use crate::sources::{SelectorRules, SourceConfig};

#[async_trait]
pub trait SourceExtractor: Send + Sync {
    fn name(&self) -> &str;
    async fn scrape(&self) -> Result<Vec<RawScholarship>>;
}

// --- Static fetch + parse ---

pub struct StaticExtractor {
    name: String,
    url: String,
    rules: SelectorRules,
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl StaticExtractor {
    pub fn new(config: &SourceConfig, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            name: config.name.to_string(),
            url: config.url.to_string(),
            rules: config.rules.clone(),
            client,
            limiter: RateLimiter::new(config.rate_limit),
        }
    }

    async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScholarstreamError::Http {
                status: status.as_u16(),
                url: self.url.clone(),
            }
            .into());
        }

        resp.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl SourceExtractor for StaticExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self) -> Result<Vec<RawScholarship>> {
        info!(source = self.name.as_str(), url = self.url.as_str(), "Fetching listings");

        let html = self.limiter.throttle(|| self.fetch()).await?;
        let records = parse_listings(&html, &self.url, &self.name, &self.rules);

        if records.is_empty() {
            warn!(source = self.name.as_str(), "No listings extracted from page");
        }
        info!(
            source = self.name.as_str(),
            count = records.len(),
            "Static extraction complete"
        );
        Ok(records)
    }
}

// --- Dynamic (JS-rendered) portals ---

/// Crawls a scripted portal through the headless rendering service: every
/// section, then pages within a section until one comes back empty or the
/// page cap is hit. Rendering is per-request on the service side, so no
/// browser session outlives an exit path here.
pub struct DynamicExtractor {
    name: String,
    sections: Vec<String>,
    rules: SelectorRules,
    client: HeadlessClient,
    limiter: RateLimiter,
    wait_ms: u64,
    max_pages: u32,
    page_param: Option<String>,
}

impl DynamicExtractor {
    pub fn new(config: &SourceConfig, client: HeadlessClient) -> Self {
        let sections = if config.sections.is_empty() {
            vec![config.url.to_string()]
        } else {
            config.sections.iter().map(|s| s.to_string()).collect()
        };

        Self {
            name: config.name.to_string(),
            sections,
            rules: config.rules.clone(),
            client,
            limiter: RateLimiter::new(config.rate_limit),
            wait_ms: config.wait_ms,
            max_pages: config.max_pages.max(1),
            page_param: config.page_param.map(String::from),
        }
    }

    fn page_url(&self, section: &str, page: u32) -> String {
        match (&self.page_param, page) {
            (Some(param), p) if p > 1 => {
                let sep = if section.contains('?') { '&' } else { '?' };
                format!("{section}{sep}{param}={p}")
            }
            _ => section.to_string(),
        }
    }
}

#[async_trait]
impl SourceExtractor for DynamicExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self) -> Result<Vec<RawScholarship>> {
        let mut records = Vec::new();

        for section in &self.sections {
            for page in 1..=self.max_pages {
                let url = self.page_url(section, page);
                info!(source = self.name.as_str(), url = url.as_str(), page, "Rendering page");

                let html = self
                    .limiter
                    .throttle(|| self.client.content_with_wait(&url, self.wait_ms))
                    .await
                    .with_context(|| format!("Rendering {url} failed"))?;

                let page_records = parse_listings(&html, section, &self.name, &self.rules);
                if page_records.is_empty() {
                    // End of this section's pagination.
                    break;
                }
                records.extend(page_records);

                if self.page_param.is_none() {
                    break;
                }
            }
        }

        info!(
            source = self.name.as_str(),
            count = records.len(),
            sections = self.sections.len(),
            "Dynamic extraction complete"
        );
        Ok(records)
    }
}

// --- Markup parsing ---

/// Pull raw records out of listing markup using a source's selector rules.
/// Listings without a name element are skipped with a warning; every other
/// field is optional by construction.
pub(crate) fn parse_listings(
    html: &str,
    base_url: &str,
    source: &str,
    rules: &SelectorRules,
) -> Vec<RawScholarship> {
    let document = Html::parse_document(html);

    let listing_sel = compile(rules.listing);
    let name_sel = compile(rules.name);
    let country_sel = rules.country.map(compile);
    let degree_sel = rules.degree.map(compile);
    let deadline_sel = rules.deadline.map(compile);
    let link_sel = rules.link.map(compile);
    let description_sel = rules.description.map(compile);
    let eligibility_sel = rules.eligibility.map(compile);
    let amount_sel = rules.amount.map(compile);

    let mut records = Vec::new();
    for listing in document.select(&listing_sel) {
        let Some(name) = text_of(listing, &name_sel) else {
            warn!(source, "Listing without a name element, skipping");
            continue;
        };

        let link = link_sel.as_ref().and_then(|sel| {
            listing
                .select(sel)
                .next()
                .and_then(|el| el.value().attr("href"))
                .map(|href| resolve_href(base_url, href))
        });

        records.push(RawScholarship {
            name,
            source: source.to_string(),
            country: optional_text(listing, &country_sel).map(Into::into),
            degree: optional_text(listing, &degree_sel).map(Into::into),
            deadline: optional_text(listing, &deadline_sel),
            link,
            description: optional_text(listing, &description_sel),
            eligibility: optional_text(listing, &eligibility_sel),
            amount: optional_text(listing, &amount_sel),
        });
    }
    records
}

/// Selector rules are compile-time source profiles; an invalid one is a
/// setup defect.
fn compile(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid selector {selector:?}: {e:?}"))
}

fn text_of(listing: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = listing.select(selector).next()?;
    let text: Vec<&str> = element.text().collect();
    let joined = text.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn optional_text(listing: ElementRef<'_>, selector: &Option<Selector>) -> Option<String> {
    selector.as_ref().and_then(|sel| text_of(listing, sel))
}

fn resolve_href(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match url::Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}
