// One full pass over every feed, then a fresh snapshot on disk
use crate::{
    export::Exporter,
    models::{CycleReport, FeedSource},
    scanner::FeedScanner,
    Result,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

pub struct ScanCycle {
    scanner: FeedScanner,
    feeds: Vec<FeedSource>,
    pause: Duration,
    export_path: PathBuf,
}

impl ScanCycle {
    pub fn new(
        scanner: FeedScanner,
        feeds: Vec<FeedSource>,
        pause: Duration,
        export_path: PathBuf,
    ) -> Self {
        Self {
            scanner,
            feeds,
            pause,
            export_path,
        }
    }

    pub fn scanner(&self) -> &FeedScanner {
        &self.scanner
    }

    /// Feeds are scanned strictly one after another. A broken feed is logged
    /// and skipped; only an export failure makes the cycle itself fail.
    pub async fn run(&self) -> Result<CycleReport> {
        info!("Scanning {} feeds...", self.feeds.len());
        let mut report = CycleReport::default();

        for (i, feed) in self.feeds.iter().enumerate() {
            match self.scanner.scan_feed(feed).await {
                Ok(feed_report) => report.feeds.push(feed_report),
                Err(e) => {
                    error!("Error scanning {}: {}", feed.name, e);
                    report.failed_feeds.push(feed.name.clone());
                }
            }

            if i + 1 < self.feeds.len() && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        report.exported = self.export()?;

        info!(
            "Scan complete. {} new notifications, {} feeds failed, {} records in {}",
            report.total_notified(),
            report.failed_feeds.len(),
            report.exported,
            self.export_path.display()
        );

        Ok(report)
    }

    /// Rewrite the snapshot from the store. Returns the number of records written.
    pub fn export(&self) -> Result<usize> {
        let records = self.scanner.store().ranked()?;
        Exporter::export_to_file(&records, &self.export_path)?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feeds::MockFeedProvider,
        models::FeedEntry,
        notify::Notifier,
        scanner::ScanSettings,
        scoring::Scorer,
        Error,
    };
    use omegaprime_store::OpportunityStore;

    fn entry(title: &str, link: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: Some(link.to_string()),
            summary: String::new(),
            published: None,
        }
    }

    fn cycle(export_path: PathBuf) -> ScanCycle {
        let mut provider = MockFeedProvider::new();
        provider.expect_fetch_entries().returning(|source, _| {
            match source.name.as_str() {
                "broken" => Err(Error::FeedError("503".into())),
                "drops" => Ok(vec![
                    entry("Grant round", "https://d.io/grant"), // 10, dropped
                    entry("Linea quest", "https://d.io/linea"), // 30
                ]),
                _ => Ok(vec![entry("Zksync airdrop, last chance", "https://q.io/zk")]), // 55
            }
        });

        let scanner = FeedScanner::new(
            Box::new(provider),
            Scorer::default(),
            OpportunityStore::open_in_memory().unwrap(),
            Notifier::new(),
            ScanSettings::default(),
        );

        ScanCycle::new(
            scanner,
            vec![
                FeedSource::new("drops", "https://d.io/rss"),
                FeedSource::new("broken", "https://broken.io/rss"),
                FeedSource::new("quests", "https://q.io/rss"),
            ],
            Duration::ZERO,
            export_path,
        )
    }

    #[tokio::test]
    async fn test_broken_feed_does_not_stop_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let cycle = cycle(dir.path().join("opportunities.csv"));

        let report = cycle.run().await.unwrap();
        assert_eq!(report.failed_feeds, vec!["broken".to_string()]);
        assert_eq!(report.feeds.len(), 2);
        assert_eq!(report.total_passed_threshold(), 2);
        assert_eq!(report.exported, 2);
    }

    #[tokio::test]
    async fn test_export_written_best_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opportunities.csv");
        cycle(path.clone()).run().await.unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        let links: Vec<&str> = csv
            .lines()
            .skip(1)
            .filter_map(|l| l.split(',').find(|f| f.starts_with("https://")))
            .collect();
        assert_eq!(links, vec!["https://q.io/zk", "https://d.io/linea"]);
    }

    #[tokio::test]
    async fn test_export_failure_fails_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let cycle = cycle(dir.path().join("no-such-dir").join("opportunities.csv"));
        assert!(cycle.run().await.is_err());
        // feeds were still processed and persisted
        assert_eq!(cycle.scanner().store().count().unwrap(), 2);
    }
}
