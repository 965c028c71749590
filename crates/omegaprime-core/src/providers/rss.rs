// RSS/Atom provider - bridges FeedClient with the FeedProvider trait
use async_trait::async_trait;
use omegaprime_api::{FeedClient, FeedItem};
use std::time::Duration;

use crate::{
    feeds::FeedProvider,
    models::{FeedEntry, FeedSource},
    Error, Result,
};

/// Wrapper around FeedClient that implements FeedProvider
pub struct RssFeedProvider {
    client: FeedClient,
}

impl RssFeedProvider {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client =
            FeedClient::new(user_agent, timeout).map_err(|e| Error::FeedError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedProvider for RssFeedProvider {
    async fn fetch_entries(&self, source: &FeedSource, limit: usize) -> Result<Vec<FeedEntry>> {
        let items = self
            .client
            .fetch(&source.url, limit)
            .await
            .map_err(|e| Error::FeedError(e.to_string()))?;

        Ok(items.into_iter().map(item_to_entry).collect())
    }
}

/// Convert a parsed feed item to our internal entry model
fn item_to_entry(item: FeedItem) -> FeedEntry {
    FeedEntry {
        title: item.title,
        link: item.link,
        summary: item.summary,
        published: item.published,
    }
}
