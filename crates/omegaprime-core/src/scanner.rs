use crate::{
    feeds::FeedProvider,
    models::{FeedReport, FeedSource},
    notify::{format_message, Notifier},
    scoring::Scorer,
    Result,
};
use chrono::Utc;
use omegaprime_store::{opportunity_id, NewOpportunity, OpportunityStore};
use tracing::{debug, info, warn};

/// Knobs for a single feed pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub entries_per_feed: usize,
    pub min_score: f64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            entries_per_feed: 15,
            min_score: 15.0,
        }
    }
}

impl From<&crate::config::ScanConfig> for ScanSettings {
    fn from(config: &crate::config::ScanConfig) -> Self {
        Self {
            entries_per_feed: config.entries_per_feed,
            min_score: config.min_score,
        }
    }
}

/// Fetch → score → filter → store → notify, for one feed at a time
pub struct FeedScanner {
    provider: Box<dyn FeedProvider>,
    scorer: Scorer,
    store: OpportunityStore,
    notifier: Notifier,
    settings: ScanSettings,
}

impl FeedScanner {
    pub fn new(
        provider: Box<dyn FeedProvider>,
        scorer: Scorer,
        store: OpportunityStore,
        notifier: Notifier,
        settings: ScanSettings,
    ) -> Self {
        Self {
            provider,
            scorer,
            store,
            notifier,
            settings,
        }
    }

    pub fn store(&self) -> &OpportunityStore {
        &self.store
    }

    /// Scan one source. Any error means this source is done for the cycle;
    /// whatever was stored before the error stays stored.
    pub async fn scan_feed(&self, source: &FeedSource) -> Result<FeedReport> {
        let mut entries = self
            .provider
            .fetch_entries(source, self.settings.entries_per_feed)
            .await?;
        entries.truncate(self.settings.entries_per_feed);

        let mut report = FeedReport {
            source: source.name.clone(),
            fetched: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            let Some(link) = entry.usable_link() else {
                debug!("Skipping entry without link in {}: {}", source.name, entry.title);
                report.skipped_no_link += 1;
                continue;
            };

            let scored = self.scorer.score(&entry.title, &entry.summary);
            if scored.score < self.settings.min_score {
                report.below_threshold += 1;
                continue;
            }

            let published = entry.published.unwrap_or_else(Utc::now).to_rfc3339();

            let opp = NewOpportunity {
                title: entry.title.clone(),
                link: link.to_string(),
                source: source.name.clone(),
                published,
                score: scored.score,
                deadline_hint: scored.deadline_hint,
            };

            report.passed_threshold += 1;
            if !self.store.upsert(&opp)? {
                continue;
            }

            info!("New high-score: {} | {}", opp.score, opp.title);
            if self.announce(&opp).await? {
                report.notified += 1;
            }
        }

        debug!(
            "{}: {} fetched, {} below threshold, {} passed threshold, {} notified",
            report.source, report.fetched, report.below_threshold, report.passed_threshold, report.notified
        );

        Ok(report)
    }

    /// Dispatch and flip the notified flag. Sink failures are logged here and
    /// go no further. Returns whether the record is now marked notified.
    async fn announce(&self, opp: &NewOpportunity) -> Result<bool> {
        let report = self.notifier.dispatch(&format_message(opp)).await;

        for (sink, err) in &report.failed {
            warn!("Notification via {} failed for {}: {}", sink, opp.link, err);
        }

        if !report.should_mark_notified() {
            return Ok(false);
        }

        self.store.mark_notified(&opportunity_id(&opp.link))?;
        Ok(true)
    }
}
