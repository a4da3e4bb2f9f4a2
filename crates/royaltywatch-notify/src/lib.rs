//! Telegram Bot API notifier implementing the [`Notifier`] capability.

use std::time::Duration;

use async_trait::async_trait;
use royaltywatch_core::{Notifier, NotifyError};
use serde::Serialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends messages to one Telegram chat via `sendMessage`.
///
/// Messages are delivered with HTML parse mode so notification text can
/// carry `<b>` and `<code>` markup.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    chat_id: String,
    base_url: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    /// Build a notifier against the production Bot API.
    pub fn new(token: String, chat_id: String) -> Result<Self, NotifyError> {
        Self::with_base_url(token, chat_id, DEFAULT_BASE_URL.to_string())
    }

    /// Build a notifier against a custom base URL (no trailing slash).
    pub fn with_base_url(
        token: String,
        chat_id: String,
        base_url: String,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            token,
            chat_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };
        debug!(chat_id = %self.chat_id, "sending telegram message");
        let resp = self
            .client
            .post(self.endpoint())
            .form(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_token() {
        let notifier = TelegramNotifier::with_base_url(
            "123:abc".into(),
            "-100200".into(),
            "https://example.test/".into(),
        )
        .unwrap();
        assert_eq!(notifier.endpoint(), "https://example.test/bot123:abc/sendMessage");
    }

    #[test]
    fn payload_carries_html_parse_mode() {
        let payload = SendMessage {
            chat_id: "-100200",
            text: "hello <b>world</b>",
            parse_mode: "HTML",
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(value["chat_id"], "-100200");
        assert_eq!(value["text"], "hello <b>world</b>");
    }
}
