use std::time::Duration;
use thiserror::Error;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TelegramError>;

/// Bot API client that posts to a single chat
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    chat_id: String,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: String, chat_id: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(token, chat_id, timeout, TELEGRAM_API_BASE.to_string())
    }

    /// For local bot API servers
    pub fn with_base_url(
        token: String,
        chat_id: String,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            token,
            chat_id,
            base_url,
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.token
        )
    }

    /// Form fields for sendMessage. HTML markup on, link previews off.
    fn form_fields<'a>(&'a self, text: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
            ("disable_web_page_preview", "true"),
        ]
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url())
            .form(&self.form_fields(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Rejected { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        TelegramClient::new("123:abc".into(), "-1001".into(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_send_message_url() {
        assert_eq!(
            client().send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );

        let local = TelegramClient::with_base_url(
            "t".into(),
            "c".into(),
            Duration::from_secs(1),
            "http://localhost:8081/".into(),
        )
        .unwrap();
        assert_eq!(local.send_message_url(), "http://localhost:8081/bott/sendMessage");
    }

    #[test]
    fn test_form_fields() {
        let client = client();
        let fields = client.form_fields("<b>hi</b>");
        assert_eq!(fields[0], ("chat_id", "-1001"));
        assert_eq!(fields[1], ("text", "<b>hi</b>"));
        assert_eq!(fields[2], ("parse_mode", "HTML"));
        assert_eq!(fields[3], ("disable_web_page_preview", "true"));
    }
}
