// src/config/settings.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;

pub const ENV_CONFIG_PATH: &str = "BOT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/bot.toml";

/// Non-secret tunables. Every field has a default, so an absent file or a
/// partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub news: NewsSettings,
    pub summarizer: SummarizerSettings,
    pub viber: ViberSettings,
    pub dispatch: DispatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewsSettings {
    pub base_url: String,
    pub language: String,
    pub max_articles: u8,
    pub timeout_secs: u64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4".to_string(),
            language: "ru".to_string(),
            max_articles: 5,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// Per-headline summary, analysis and forecast.
    #[default]
    Structured,
    /// One short paragraph.
    Brief,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub style: PromptStyle,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 15,
            style: PromptStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViberSettings {
    pub base_url: String,
    pub sender_name: String,
    pub timeout_secs: u64,
    /// Check `X-Viber-Content-Signature` on inbound webhooks.
    pub verify_signature: bool,
}

impl Default for ViberSettings {
    fn default() -> Self {
        Self {
            base_url: "https://chatapi.viber.com/pa".to_string(),
            sender_name: "Мой Новостной Бот".to_string(),
            timeout_secs: 5,
            verify_signature: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchSettings {
    /// Upper bound on pipelines running at once; the rest wait for a slot.
    pub max_in_flight: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self { max_in_flight: 32 }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str, origin: &str) -> Result<Self, ConfigError> {
        let cfg: Settings = toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 1) $BOT_CONFIG_PATH (must exist)
    /// 2) config/bot.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(&p);
            if !pb.exists() {
                return Err(ConfigError::MissingFile(p));
            }
            return Self::load_from(&pb);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }

    /// Clamp values into ranges the providers accept.
    fn sanitized(mut self) -> Self {
        self.news.max_articles = self.news.max_articles.clamp(1, 10);
        self.dispatch.max_in_flight = self.dispatch.max_in_flight.max(1);
        for t in [
            &mut self.news.timeout_secs,
            &mut self.summarizer.timeout_secs,
            &mut self.viber.timeout_secs,
        ] {
            if *t == 0 {
                *t = 1;
            }
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
