use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("Webhook rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DiscordError>;

/// Incoming-webhook client. No bot, no gateway, just a POST.
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    fn payload(content: &str) -> serde_json::Value {
        serde_json::json!({ "content": content })
    }

    pub async fn send(&self, content: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(content))
            .send()
            .await?;

        // Discord answers 204 No Content on success
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Rejected { status, body });
        }

        Ok(())
    }
}
