//! Handles settings for the application. Configuration is written in
//! `settings.toml`; every key can also come from the environment with the
//! `SKARBNYK` prefix (e.g. `SKARBNYK__TELEGRAM__TOKEN`).
//!
//! See `settings.example.toml` for the configuration.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
    /// Full connection string, e.g. a Postgres URL.
    Url(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Telegram {
    pub token: String,
    pub webhook_url: Option<String>,
    pub webhook_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub telegram: Telegram,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("SKARBNYK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
