use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, eyre};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use crate::error::PollError;

/// Something that can deliver a text message to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text` to `chat_id`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramBot {
    http: HttpClient,
    api_url: Url,
    token: String,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot").field("api_url", &self.api_url).finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    /// Create a bot client with its own HTTP transport bounded by `timeout`.
    pub fn new(api_url: Url, token: String, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, api_url, token })
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("telegram API URL cannot be a base"))?
            .pop_if_empty()
            .push(&format!("bot{}", self.token))
            .push(method);
        Ok(url)
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = self.method_url("sendMessage")?;
        let resp = self
            .http
            .post(url)
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            // the request URL carries the bot token
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        let text = resp.text().await.map_err(reqwest::Error::without_url)?;

        match serde_json::from_str::<ApiResponse>(&text) {
            Ok(body) if status.is_success() && body.ok => {}
            Ok(body) => {
                return Err(eyre!(
                    "telegram rejected sendMessage ({}): {}",
                    status.as_u16(),
                    body.description.unwrap_or_else(|| "no description".to_owned())
                ));
            }
            Err(e) => {
                let snippet = text.chars().take(200).collect::<String>();
                return Err(eyre!(
                    "telegram returned a non-JSON response ({}): {} ({})",
                    status.as_u16(),
                    snippet,
                    e
                ));
            }
        }
        Ok(())
    }
}

/// Delivers notifications to a fixed chat with audit logging.
#[derive(Debug)]
pub struct Notifier<M> {
    messenger: M,
    chat_id: String,
}

impl<M: Messenger> Notifier<M> {
    /// Create a notifier for `chat_id`.
    pub const fn new(messenger: M, chat_id: String) -> Self {
        Self { messenger, chat_id }
    }

    /// Send `message`. No retry happens here.
    pub async fn notify(&self, message: &str) -> Result<(), PollError> {
        info!(chat_id = %self.chat_id, message, "Sending message");

        if let Err(e) = self.messenger.send_message(&self.chat_id, message).await {
            error!(chat_id = %self.chat_id, message, error = %format!("{e:#}"), "Failed to send message");
            return Err(PollError::delivery(e));
        }

        info!(chat_id = %self.chat_id, message, "Message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn bot_for(server: &Server) -> TelegramBot {
        TelegramBot::new(
            Url::parse(&server.url()).unwrap(),
            "123:abc".to_owned(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn telegram_send_message_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"chat_id": "42", "text": "hello"})))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .create_async()
            .await;

        bot_for(&server).send_message("42", "hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn telegram_error_carries_description() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(400)
            .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let err = bot_for(&server).send_message("42", "hello").await.unwrap_err();
        assert!(err.to_string().contains("chat not found"), "{err}");
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn telegram_ok_false_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok":false}"#)
            .create_async()
            .await;

        assert!(bot_for(&server).send_message("42", "hello").await.is_err());
    }

    #[tokio::test]
    async fn telegram_non_json_error_keeps_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(502)
            .with_header("content-type", "text/html")
            .with_body("<html><body>Bad Gateway</body></html>")
            .create_async()
            .await;

        let err = bot_for(&server).send_message("42", "hello").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("502"), "{msg}");
        assert!(msg.contains("Bad Gateway"), "{msg}");
        assert!(!msg.contains("123:abc"), "{msg}");
    }

    #[tokio::test]
    async fn notifier_classifies_failures_as_delivery() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(500)
            .with_body(r#"{"ok":false,"description":"Internal"}"#)
            .create_async()
            .await;

        let notifier = Notifier::new(bot_for(&server), "42".to_owned());
        let err = notifier.notify("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeliveryFailure);
    }

    #[test]
    fn debug_does_not_leak_token() {
        let bot = TelegramBot::new(
            Url::parse("https://api.telegram.org").unwrap(),
            "123:secret".to_owned(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{bot:?}").contains("secret"));
    }
}
