use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed we poll every cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// An entry handed over by a feed provider, not scored yet
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    /// Entries without a link can't be deduplicated and get dropped
    pub link: Option<String>,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    /// The link, if there is one worth keying on
    pub fn usable_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

/// What happened while scanning one feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub source: String,
    pub fetched: usize,
    pub skipped_no_link: usize,
    pub below_threshold: usize,
    /// Entries that passed the threshold and went through the store,
    /// repeat sightings included
    pub passed_threshold: usize,
    pub notified: usize,
}

/// Totals for a whole scan cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub feeds: Vec<FeedReport>,
    pub failed_feeds: Vec<String>,
    pub exported: usize,
}

impl CycleReport {
    pub fn total_passed_threshold(&self) -> usize {
        self.feeds.iter().map(|f| f.passed_threshold).sum()
    }

    pub fn total_notified(&self) -> usize {
        self.feeds.iter().map(|f| f.notified).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(link: Option<&str>) -> FeedEntry {
        FeedEntry {
            title: "t".into(),
            link: link.map(String::from),
            summary: String::new(),
            published: None,
        }
    }

    #[test]
    fn test_usable_link() {
        assert_eq!(entry(Some(" https://a.io ")).usable_link(), Some("https://a.io"));
        assert_eq!(entry(Some("   ")).usable_link(), None);
        assert_eq!(entry(None).usable_link(), None);
    }

    #[test]
    fn test_cycle_totals() {
        let report = CycleReport {
            feeds: vec![
                FeedReport { passed_threshold: 2, notified: 1, ..Default::default() },
                FeedReport { passed_threshold: 3, notified: 0, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(report.total_passed_threshold(), 5);
        assert_eq!(report.total_notified(), 1);
    }
}
