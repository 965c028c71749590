// Core logic: score entries, remember them, shout about the new ones
pub mod config;
pub mod cycle;
pub mod error;
pub mod export;
pub mod feeds;
pub mod models;
pub mod notify;
pub mod providers;
pub mod scanner;
pub mod schedule;
pub mod scoring;

pub use config::Config;
pub use cycle::ScanCycle;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use feeds::FeedProvider;
pub use models::{CycleReport, FeedEntry, FeedReport, FeedSource};
pub use notify::{format_message, DispatchReport, NotificationSink, Notifier};
pub use scanner::{FeedScanner, ScanSettings};
pub use schedule::Scheduler;
pub use scoring::{ScoreResult, Scorer};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;

/// Wire up the production scan cycle from a config
pub fn build_cycle(config: &Config) -> Result<ScanCycle> {
    let store = omegaprime_store::OpportunityStore::open(&config.storage.database)?;
    let provider =
        providers::RssFeedProvider::new(&config.scan.user_agent, config.scan.fetch_timeout())?;
    let notifier = Notifier::from_config(&config.notify)?;
    if notifier.sink_count() == 0 {
        tracing::warn!("No Telegram or Discord credentials, new records are only stored");
    }

    let scanner = FeedScanner::new(
        Box::new(provider),
        Scorer::new(&config.scoring),
        store,
        notifier,
        ScanSettings::from(&config.scan),
    );

    Ok(ScanCycle::new(
        scanner,
        config.feeds.clone(),
        config.scan.pause(),
        config.storage.export.clone(),
    ))
}
