// Best-effort fan-out to Telegram / Discord
use crate::{config::NotifyConfig, Result};
use async_trait::async_trait;
use omegaprime_store::NewOpportunity;
use tracing::debug;

/// A place notifications can be sent to
///
/// Implementations should bound their own wait (client timeout) and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, message: &str) -> Result<()>;
}

/// Outcome of one dispatch, sink by sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    /// Whether the record counts as announced: some sink took it, or there
    /// were no sinks. If every configured sink failed it stays pending.
    pub fn should_mark_notified(&self) -> bool {
        self.attempted() == 0 || !self.delivered.is_empty()
    }
}

/// Sends a message to every configured sink, one after the other
#[derive(Default)]
pub struct Notifier {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sinks whose credentials are present; the rest are skipped silently
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        use crate::providers::{DiscordSink, TelegramSink};

        let mut notifier = Self::new();

        match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                notifier.add_sink(Box::new(TelegramSink::new(
                    token.clone(),
                    chat_id.clone(),
                    config.timeout(),
                )?));
            }
            _ => debug!("Telegram not configured, skipping"),
        }

        match &config.discord_webhook {
            Some(url) => {
                notifier.add_sink(Box::new(DiscordSink::new(url.clone(), config.timeout())?));
            }
            None => debug!("Discord webhook not configured, skipping"),
        }

        Ok(notifier)
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Never fails. Whatever went wrong comes back in the report.
    pub async fn dispatch(&self, message: &str) -> DispatchReport {
        let mut report = DispatchReport::default();

        for sink in &self.sinks {
            match sink.send(message).await {
                Ok(()) => report.delivered.push(sink.name()),
                Err(e) => report.failed.push((sink.name(), e.to_string())),
            }
        }

        report
    }
}

/// Telegram HTML mode chokes on stray brackets in titles
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Human-readable alert for a new opportunity
pub fn format_message(opp: &NewOpportunity) -> String {
    let deadline = if opp.deadline_hint.is_empty() {
        "No deadline hint"
    } else {
        opp.deadline_hint.as_str()
    };

    format!(
        "🚀 <b>NEW HIGH-SCORE OPPORTUNITY</b> | Score: {}\n\n\
         📌 <b>{}</b>\n\
         🔗 {}\n\
         🗓 {}\n\
         📡 Source: {}",
        opp.score,
        escape_html(&opp.title),
        escape_html(&opp.link),
        escape_html(deadline),
        escape_html(&opp.source),
    )
}
