// ABOUTME: Outbound messaging abstraction
// ABOUTME: Trait seam between the bot core and the concrete delivery channel

use async_trait::async_trait;
use thiserror::Error;

/// Gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error: {0}")]
    Api(String),
}

/// Outbound half of the messaging channel.
///
/// Delivery failures are per-recipient: callers log them and keep going, so
/// one unreachable user never blocks replies or reminders for the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_text(&self, owner_id: i64, text: &str) -> Result<(), GatewayError>;
}
