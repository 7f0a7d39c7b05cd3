// src/config/mod.rs
//! Process-wide configuration, loaded once at startup and handed to each
//! component by value. Nothing here is mutated after `AppConfig::load`.

pub mod secrets;
pub mod settings;

pub use secrets::Secrets;
pub use settings::{PromptStyle, Settings};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required secret {0} is missing or blank")]
    MissingSecret(&'static str),

    #[error("settings file {path} could not be read: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("BOT_CONFIG_PATH points to non-existent path {0}")]
    MissingFile(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secrets: Secrets,
    pub settings: Settings,
}

impl AppConfig {
    /// Reads secrets from the environment and settings from the default file locations.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env()?;
        let settings = Settings::load_default()?;

        // Safe diagnostics: presence and length only.
        info!(
            viber_token_len = secrets.viber_auth_token.len(),
            news_key = secrets.news_api_key.is_some(),
            gemini_key = secrets.gemini_api_key.is_some(),
            "secrets loaded"
        );
        if secrets.news_api_key.is_none() {
            warn!("NEWS_API_KEY not set; every news request will resolve to no data");
        }
        if secrets.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; summaries disabled, users get the unavailable notice");
        }

        Ok(Self { secrets, settings })
    }
}
