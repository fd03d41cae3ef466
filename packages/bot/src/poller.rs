// ABOUTME: Long-polling update dispatch loop
// ABOUTME: Routes inbound commands and text to the conversation engine and sends replies

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{error, info, warn};

use crate::commands::Command;
use crate::engine::ConversationEngine;
use crate::gateway::MessagingGateway;
use crate::telegram::TelegramGateway;

/// Back off briefly after a failed poll instead of hammering the API.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fetch and dispatch updates forever.
///
/// Transport errors back off and retry; per-message failures are logged and
/// skipped. Nothing thrown below ever escapes this loop.
pub async fn run_polling(gateway: Arc<TelegramGateway>, engine: Arc<ConversationEngine>) {
    info!("Bot started, polling for updates");

    let mut offset = 0i64;
    loop {
        let updates = match gateway.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("Failed to fetch updates: {}", e);
                time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            if update.update_id >= offset {
                offset = update.update_id + 1;
            }

            let message = match update.message {
                Some(message) => message,
                None => continue,
            };
            let text = match message.text {
                Some(text) => text,
                None => continue,
            };
            let owner_id = message.chat.id;

            let reply = if text.starts_with('/') {
                // Unknown slash-words are neither commands nor flow input
                match Command::parse(&text) {
                    Some(command) => engine.on_command(owner_id, command).await,
                    None => None,
                }
            } else {
                engine.on_text(owner_id, &text).await
            };

            if let Some(reply) = reply {
                if let Err(e) = gateway.send_text(owner_id, &reply).await {
                    error!("Failed to send reply to {}: {}", owner_id, e);
                }
            }
        }
    }
}
