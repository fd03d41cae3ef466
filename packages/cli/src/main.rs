// ABOUTME: Promemoria bot entry point
// ABOUTME: Wires configuration, storage, engine, notifier and the polling loop

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use promemoria_bot::{ConversationEngine, DueNotifier, TelegramGateway};
use promemoria_tasks::TaskStorage;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let pool = match promemoria_storage::init_pool_with_path(Some(config.database_path.clone())).await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let tasks = Arc::new(TaskStorage::new(pool));
    let gateway = Arc::new(TelegramGateway::new(&config.bot_token)?);
    let engine = Arc::new(ConversationEngine::new(tasks.clone()));

    let notifier = DueNotifier::new(tasks, gateway.clone());
    notifier.start().await;

    info!("Promemoria bot ready");

    tokio::select! {
        _ = promemoria_bot::run_polling(gateway.clone(), engine) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    notifier.stop().await;

    Ok(())
}
