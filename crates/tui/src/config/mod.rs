use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timezone: String,
    pub state_path: String,
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            state_path: crate::local_state::default_state_path().to_string(),
            offline: false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "campuz_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3001).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name) used for displayed timestamps.
    #[arg(long)]
    timezone: Option<String>,
    /// Override the client state file path.
    #[arg(long)]
    state_path: Option<String>,
    /// Run against local state only, without a server.
    #[arg(long)]
    offline: bool,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CAMPUZ_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }
    if args.offline {
        settings.offline = true;
    }

    Ok(settings)
}
