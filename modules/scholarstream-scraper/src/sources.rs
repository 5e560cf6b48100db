//! Source registry.
//!
//! Each entry describes one institution or portal: how to reach it, how hard
//! we may hit it, and the selector rules that turn its markup into raw
//! records. The rules are swappable strategy data, not part of the
//! orchestration contract.

use headless_client::HeadlessClient;
use scholarstream_common::Config;

use crate::extract::{DynamicExtractor, SourceExtractor, StaticExtractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Single HTTP fetch + markup parse.
    Static,
    /// Scripted browser rendering, multi-section, paginated.
    Dynamic,
}

/// CSS selectors for one source's listing markup. `listing` scopes one
/// record; the rest are resolved within it. Only `name` is mandatory.
#[derive(Debug, Clone)]
pub struct SelectorRules {
    pub listing: &'static str,
    pub name: &'static str,
    pub country: Option<&'static str>,
    pub degree: Option<&'static str>,
    pub deadline: Option<&'static str>,
    pub link: Option<&'static str>,
    pub description: Option<&'static str>,
    pub eligibility: Option<&'static str>,
    pub amount: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub enabled: bool,
    pub name: &'static str,
    pub url: &'static str,
    pub kind: SourceKind,
    /// Outbound requests per second against this source.
    pub rate_limit: f64,
    pub timeout_secs: u64,
    pub rules: SelectorRules,
    /// Dynamic only: portal sections to crawl. Empty means just `url`.
    pub sections: &'static [&'static str],
    /// Dynamic only: render settle delay per page.
    pub wait_ms: u64,
    /// Dynamic only: pagination cap per section.
    pub max_pages: u32,
    /// Dynamic only: query parameter driving pagination, e.g. "page".
    pub page_param: Option<&'static str>,
}

/// The built-in source table.
pub fn source_profiles() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            enabled: true,
            name: "Scholars4Dev",
            url: "https://www.scholars4dev.com/category/scholarships-list/",
            kind: SourceKind::Static,
            rate_limit: 1.0,
            timeout_secs: 20,
            rules: SelectorRules {
                listing: "article.post",
                name: "h2.entry-title a",
                country: None,
                degree: None,
                deadline: None,
                link: Some("h2.entry-title a"),
                description: Some("div.entry-summary p"),
                eligibility: None,
                amount: None,
            },
            sections: &[],
            wait_ms: 0,
            max_pages: 1,
            page_param: None,
        },
        SourceConfig {
            enabled: true,
            name: "DAAD",
            url: "https://www.daad.de/en/studying-in-germany/scholarships/daad-scholarships/",
            kind: SourceKind::Static,
            rate_limit: 0.5,
            timeout_secs: 20,
            rules: SelectorRules {
                listing: "li.c-list-item",
                name: "h3.c-list-item__headline",
                country: None,
                degree: Some("span.c-list-item__level"),
                deadline: Some("span.c-list-item__deadline"),
                link: Some("a.c-list-item__link"),
                description: Some("p.c-list-item__text"),
                eligibility: None,
                amount: None,
            },
            sections: &[],
            wait_ms: 0,
            max_pages: 1,
            page_param: None,
        },
        SourceConfig {
            enabled: true,
            name: "Study in the UK",
            url: "https://study-uk.britishcouncil.org/scholarships-funding/scholarships",
            kind: SourceKind::Static,
            rate_limit: 0.5,
            timeout_secs: 20,
            rules: SelectorRules {
                listing: "div.scholarship-teaser",
                name: "h3.scholarship-teaser__title",
                country: Some("div.scholarship-teaser__countries"),
                degree: Some("div.scholarship-teaser__level"),
                deadline: Some("div.scholarship-teaser__deadline"),
                link: Some("a.scholarship-teaser__link"),
                description: Some("div.scholarship-teaser__summary"),
                eligibility: Some("div.scholarship-teaser__eligibility"),
                amount: Some("div.scholarship-teaser__value"),
            },
            sections: &[],
            wait_ms: 0,
            max_pages: 1,
            page_param: None,
        },
        SourceConfig {
            enabled: true,
            name: "ScholarshipPortal",
            url: "https://www.scholarshipportal.com/scholarships",
            kind: SourceKind::Dynamic,
            rate_limit: 0.5,
            timeout_secs: 45,
            rules: SelectorRules {
                listing: "div[data-testid='scholarship-card']",
                name: "h2[data-testid='scholarship-title']",
                country: Some("span[data-testid='scholarship-country']"),
                degree: Some("span[data-testid='scholarship-level']"),
                deadline: Some("span[data-testid='scholarship-deadline']"),
                link: Some("a[data-testid='scholarship-link']"),
                description: Some("p[data-testid='scholarship-summary']"),
                eligibility: None,
                amount: Some("span[data-testid='scholarship-amount']"),
            },
            sections: &[
                "https://www.scholarshipportal.com/scholarships/bachelor",
                "https://www.scholarshipportal.com/scholarships/master",
                "https://www.scholarshipportal.com/scholarships/phd",
            ],
            wait_ms: 2_500,
            max_pages: 5,
            page_param: Some("page"),
        },
        SourceConfig {
            enabled: true,
            name: "IEFA",
            url: "https://www.iefa.org/scholarships",
            kind: SourceKind::Dynamic,
            rate_limit: 0.5,
            timeout_secs: 45,
            rules: SelectorRules {
                listing: "div.award-row",
                name: "a.award-name",
                country: Some("td.award-nationality"),
                degree: Some("td.award-level"),
                deadline: Some("td.award-deadline"),
                link: Some("a.award-name"),
                description: None,
                eligibility: None,
                amount: Some("td.award-amount"),
            },
            sections: &[],
            wait_ms: 2_000,
            max_pages: 3,
            page_param: Some("Page"),
        },
    ]
}

/// Build one extractor per enabled source.
pub fn build_extractors(config: &Config) -> Vec<Box<dyn SourceExtractor>> {
    source_profiles()
        .iter()
        .filter(|p| p.enabled)
        .map(|profile| -> Box<dyn SourceExtractor> {
            match profile.kind {
                SourceKind::Static => {
                    Box::new(StaticExtractor::new(profile, &config.user_agent))
                }
                SourceKind::Dynamic => {
                    let client = HeadlessClient::new(
                        &config.headless_url,
                        config.headless_token.as_deref(),
                    );
                    Box::new(DynamicExtractor::new(profile, client))
                }
            }
        })
        .collect()
}
