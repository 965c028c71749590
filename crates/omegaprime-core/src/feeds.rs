use crate::{
    models::{FeedEntry, FeedSource},
    Result,
};

/// Trait for feed providers - lets the scanner run against fakes in tests
///
/// The production one speaks HTTP + RSS/Atom, but anything that can hand
/// back a list of entries for a source will do.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    /// Newest entries first, at most `limit` of them
    async fn fetch_entries(&self, source: &FeedSource, limit: usize) -> Result<Vec<FeedEntry>>;
}
