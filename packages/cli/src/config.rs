// ABOUTME: Environment-driven configuration for the Promemoria binary
// ABOUTME: Reads the bot credential and database location with sane defaults

use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set. Check your .env file")]
    MissingToken,
}

#[derive(Debug)]
pub struct Config {
    pub bot_token: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = match env::var("BOT_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ => return Err(ConfigError::MissingToken),
        };

        let database_path = env::var("PROMEMORIA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| promemoria_core::database_file());

        Ok(Config {
            bot_token,
            database_path,
        })
    }
}
