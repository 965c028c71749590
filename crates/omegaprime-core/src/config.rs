use crate::models::FeedSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
///
/// Loaded from a TOML file (or built-in defaults), then notification
/// credentials are overridden from the environment. Built once at startup and
/// handed to the scorer, scanner and notifier; nothing reads globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSource>,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            scoring: ScoringConfig::default(),
            scan: ScanConfig::default(),
            storage: StorageConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, or the default location, or fall
    /// back to defaults. An explicit path that doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(crate::Error::ConfigError(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => Self::config_path().filter(|p| p.exists()),
        };

        match path {
            Some(p) => {
                let contents = std::fs::read_to_string(&p)?;
                Self::from_toml_str(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Where we look when no --config is given
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("omegaprime").join("config.toml"))
    }

    /// Override notification credentials from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Same as `apply_env` with a pluggable lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TG_BOT_TOKEN") {
            self.notify.telegram_bot_token = Some(token);
        }
        if let Some(chat) = get("TG_CHAT_ID") {
            self.notify.telegram_chat_id = Some(chat);
        }
        if let Some(webhook) = get("DISCORD_WEBHOOK") {
            self.notify.discord_webhook = Some(webhook);
        }
    }
}

/// Default sources: announcement feeds plus a handful of Twitter accounts via RSSHub
pub fn default_feeds() -> Vec<FeedSource> {
    let mut feeds = vec![
        FeedSource::new("AirdropAlert RSS", "https://airdropalert.com/rss"),
        FeedSource::new("Binance Academy", "https://academy.binance.com/en/articles.rss"),
        FeedSource::new("CoinList Announcements", "https://coinlist.co/rss"),
        FeedSource::new("DeFi Airdrops", "https://defiairdrops.io/feed/"),
        FeedSource::new("AirdropKing.io", "https://airdropking.io/feed/"),
        FeedSource::new("CryptoRank Airdrops", "https://cryptorank.io/feed"),
        // unofficial, served through RSSHub
        FeedSource::new("Galxe Quest Feed", "https://galxe.com/feed"),
        FeedSource::new("Layer3 Quests", "https://layer3.xyz/feed"),
    ];

    const TWITTER_USERS: [&str; 7] = [
        "airdropinspect",
        "dropstoken",
        "gem_insider",
        "defi_airdrops",
        "ItsAlwaysZonny",
        "starrynift",
        "0xNonceSense",
    ];

    feeds.extend(TWITTER_USERS.iter().map(|user| FeedSource {
        name: format!("Twitter @{}", user),
        url: format!("https://rsshub.app/twitter/user/{}/exclude_replies", user),
    }));

    feeds
}

/// Keyword tiers and their weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub high_value_keywords: Vec<String>,
    pub urgent_keywords: Vec<String>,
    pub hot_topic_keywords: Vec<String>,
    pub high_value_weight: f64,
    pub urgent_weight: f64,
    pub hot_topic_weight: f64,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_value_keywords: strings(&[
                "airdrop",
                "testnet",
                "incentive",
                "reward",
                "points",
                "faucet",
                "retroactive",
                "grant",
                "bounty",
                "quest",
                "galxe",
                "layer3",
                "zealy",
                "crew3",
                "taskon",
                "guild.xyz",
                "pre-tge",
                "mainnet soon",
            ]),
            urgent_keywords: strings(&["24h", "48h", "ends soon", "last chance", "deadline"]),
            // 2025's hot projects, tune as the meta moves
            hot_topic_keywords: strings(&[
                "zksync",
                "scroll",
                "linea",
                "blast",
                "taiko",
                "eigenlayer",
                "zircuit",
                "berachain",
                "monad",
            ]),
            high_value_weight: 10.0,
            urgent_weight: 25.0,
            hot_topic_weight: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Only the newest N entries of each feed are looked at
    #[serde(default = "default_entries_per_feed")]
    pub entries_per_feed: usize,

    /// Anything scoring below this is noise
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Pause between two feeds, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_between_feeds_ms: u64,

    /// Watch mode interval
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_entries_per_feed() -> usize {
    15
}

fn default_min_score() -> f64 {
    15.0
}

fn default_pause_ms() -> u64 {
    1000 // be nice to the providers
}

fn default_interval_minutes() -> u64 {
    20
}

fn default_user_agent() -> String {
    omegaprime_api::DEFAULT_USER_AGENT.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            entries_per_feed: default_entries_per_feed(),
            min_score: default_min_score(),
            pause_between_feeds_ms: default_pause_ms(),
            interval_minutes: default_interval_minutes(),
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl ScanConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_between_feeds_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database: PathBuf,
    pub export: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("opportunities.db"),
            export: PathBuf::from("opportunities.csv"),
        }
    }
}

/// Notification sinks. A sink with missing credentials is simply off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub discord_webhook: Option<String>,
    /// Per-attempt timeout in seconds
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_notify_timeout() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            discord_webhook: None,
            timeout_secs: default_notify_timeout(),
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
