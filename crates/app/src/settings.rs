//! Settings for the application, read from `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for our own crates, e.g. "info" or "debug".
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Database {
    /// In-memory SQLite, wiped on restart. Useful for demos.
    Memory,
    /// SQLite file, created on first start.
    Sqlite { path: String },
    /// Full connection URL passed through to the driver.
    Url { url: String },
}

#[derive(Debug, Deserialize)]
pub struct Admin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
    pub admin: Admin,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
