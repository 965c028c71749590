use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "OmegaPrime/1.0";

#[derive(Error, Debug)]
pub enum FeedClientError {
    #[error("Feed request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Feed parsing failed: {0}")]
    ParseError(#[from] feed_rs::parser::ParseFeedError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FeedClientError>;

/// One entry as it came out of the feed, before any scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

/// Fetches RSS / Atom / JSON feeds over HTTP
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a feed and return at most `limit` entries, in document order
    pub async fn fetch(&self, url: &str, limit: usize) -> Result<Vec<FeedItem>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedClientError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let items = parse_feed(&body, limit)?;
        debug!("Fetched {} entries from {}", items.len(), url);
        Ok(items)
    }
}

/// Parse raw feed bytes. feed-rs sniffs the format for us.
pub fn parse_feed(bytes: &[u8], limit: usize) -> Result<Vec<FeedItem>> {
    let feed = feed_rs::parser::parse(bytes)?;

    let items = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let link = canonical_link(&entry.links);

            // Some feeds only ship <content>, no <summary>
            let summary = entry
                .summary
                .map(|t| t.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            FeedItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link,
                summary,
                published: entry.published.or(entry.updated),
            }
        })
        .collect();

    Ok(items)
}

/// The entry's own page: first `alternate` (or untyped) link, else whatever comes first.
/// Atom feeds happily list `replies` and `edit` links ahead of it.
fn canonical_link(links: &[feed_rs::model::Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}
