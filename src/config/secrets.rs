// src/config/secrets.rs
use std::env;

use super::ConfigError;

pub const ENV_VIBER_AUTH_TOKEN: &str = "VIBER_AUTH_TOKEN";
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Provider credentials. Only the chat token is mandatory.
#[derive(Clone)]
pub struct Secrets {
    pub viber_auth_token: String,
    pub news_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("viber_auth_token", &"<redacted>")
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        let viber_auth_token =
            non_blank(ENV_VIBER_AUTH_TOKEN).ok_or(ConfigError::MissingSecret(ENV_VIBER_AUTH_TOKEN))?;
        Ok(Self {
            viber_auth_token,
            news_api_key: non_blank(ENV_NEWS_API_KEY),
            gemini_api_key: non_blank(ENV_GEMINI_API_KEY),
        })
    }
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
