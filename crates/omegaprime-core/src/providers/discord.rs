use async_trait::async_trait;
use omegaprime_api::DiscordWebhook;
use std::time::Duration;

use crate::{notify::NotificationSink, Error, Result};

/// Discord incoming webhook as a notification sink
pub struct DiscordSink {
    webhook: DiscordWebhook,
}

impl DiscordSink {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let webhook =
            DiscordWebhook::new(url, timeout).map_err(|e| Error::NotifyError(e.to_string()))?;
        Ok(Self { webhook })
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.webhook
            .send(message)
            .await
            .map_err(|e| Error::NotifyError(e.to_string()))
    }
}
