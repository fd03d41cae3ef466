// ABOUTME: Telegram Bot API client
// ABOUTME: Long-polling getUpdates plus sendMessage over reqwest

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::gateway::{GatewayError, MessagingGateway};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Long-poll wait passed to getUpdates. The HTTP client timeout must sit
/// above this or every empty poll reports as a transport error.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, GatewayError> {
        if self.ok {
            self.result
                .ok_or_else(|| GatewayError::Api("missing result payload".to_string()))
        } else {
            Err(GatewayError::Api(
                self.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// One inbound update from getUpdates. Only text messages matter here;
/// everything else deserializes with `message: None` and is skipped.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram Bot API client. The chat id doubles as the owner id across the
/// rest of the system.
pub struct TelegramGateway {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramGateway {
    pub fn new(token: &str) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", TELEGRAM_API_BASE, token),
        })
    }

    /// Long-poll for the next batch of updates at and after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, GatewayError> {
        let response: ApiResponse<Vec<Update>> = self
            .http
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[("offset", offset), ("timeout", POLL_TIMEOUT_SECS as i64)])
            .send()
            .await?
            .json()
            .await?;

        let updates = response.into_result()?;
        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }
        Ok(updates)
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_text(&self, owner_id: i64, text: &str) -> Result<(), GatewayError> {
        debug!("Sending message to chat: {}", owner_id);

        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&serde_json::json!({ "chat_id": owner_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;

        response.into_result().map(|_| ())
    }
}
