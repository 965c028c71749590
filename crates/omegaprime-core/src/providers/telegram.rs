use async_trait::async_trait;
use omegaprime_api::TelegramClient;
use std::time::Duration;

use crate::{notify::NotificationSink, Error, Result};

/// Telegram bot as a notification sink
pub struct TelegramSink {
    client: TelegramClient,
}

impl TelegramSink {
    pub fn new(token: String, chat_id: String, timeout: Duration) -> Result<Self> {
        let client = TelegramClient::new(token, chat_id, timeout)
            .map_err(|e| Error::NotifyError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.client
            .send_message(message)
            .await
            .map_err(|e| Error::NotifyError(e.to_string()))
    }
}
