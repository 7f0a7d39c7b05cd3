// src/summarize/mod.rs
//! AI digest of a headline block.
//!
//! [`TextGenerator`] does the remote call and may fail. [`Summarizer`] wraps it
//! with the fixed editor prompt, a timeout, and the user-facing fallbacks, so
//! callers always get a string they can send.

pub mod gemini;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use metrics::counter;
use tracing::{info, warn};

use crate::config::PromptStyle;

pub use gemini::GeminiGenerator;

/// Sent when there was nothing to summarize.
pub const NO_INPUT_TEXT: &str = "Не удалось получить новости для анализа.";
/// Sent when the generative service failed or is not configured.
pub const UNAVAILABLE_TEXT: &str = "Извините, ИИ-аналитик временно недоступен.";
/// Separator the structured prompt asks the model to put between items.
pub const ITEM_DELIMITER: &str = "---";

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub type DynGenerator = Arc<dyn TextGenerator>;

/// Installed when no API key is configured. Every call fails, which the
/// [`Summarizer`] turns into [`UNAVAILABLE_TEXT`].
pub struct DisabledGenerator;

#[async_trait::async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("generative text integration disabled (no API key)")
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

pub fn build_prompt(style: PromptStyle, headlines: &str) -> String {
    match style {
        PromptStyle::Structured => format!(
            "Ты — профессиональный аналитический редактор новостей. \
             Разбери каждый заголовок из списка ниже отдельно. \
             Для каждой новости напиши на русском языке три коротких блока: \
             «Суть» (одно-два предложения), «Анализ» (почему это важно) и \
             «Прогноз» (что может произойти дальше). \
             Не используй Markdown, верни чистый текст. \
             Раздели новости строкой {ITEM_DELIMITER}\n\n\
             Вот новости:\n{headlines}"
        ),
        PromptStyle::Brief => format!(
            "Ты — профессиональный новостной редактор. \
             Проанализируй следующий набор новостных заголовков. \
             Напиши одну связную, краткую сводку (не более 3-4 предложений) на русском языке, \
             излагая главные события. \
             Не используй Markdown, просто верни чистый текст.\n\n\
             Вот новости:\n{headlines}"
        ),
    }
}

#[derive(Clone)]
pub struct Summarizer {
    generator: DynGenerator,
    style: PromptStyle,
    timeout: Duration,
}

impl Summarizer {
    pub fn new(generator: DynGenerator, style: PromptStyle, timeout: Duration) -> Self {
        Self {
            generator,
            style,
            timeout,
        }
    }

    /// Generated text on success, otherwise one of the fixed fallbacks.
    /// An empty or absent block skips the remote call entirely.
    pub async fn summarize(&self, headlines: Option<&str>) -> String {
        let Some(block) = headlines.map(str::trim).filter(|b| !b.is_empty()) else {
            counter!("summarize_total", "result" => "no_input").increment(1);
            return NO_INPUT_TEXT.to_string();
        };

        let prompt = build_prompt(self.style, block);
        let provider = self.generator.name();
        info!(target: "summarize", provider, chars = prompt.chars().count(), "requesting summary");

        match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                counter!("summarize_total", "result" => "ok").increment(1);
                info!(target: "summarize", provider, "summary received");
                text
            }
            Ok(Ok(_)) => {
                counter!("summarize_total", "result" => "error").increment(1);
                warn!(target: "summarize", provider, "generator returned empty text");
                UNAVAILABLE_TEXT.to_string()
            }
            Ok(Err(e)) => {
                counter!("summarize_total", "result" => "error").increment(1);
                warn!(target: "summarize", provider, error = %e, "summary generation failed");
                UNAVAILABLE_TEXT.to_string()
            }
            Err(_) => {
                counter!("summarize_total", "result" => "timeout").increment(1);
                warn!(target: "summarize", provider, timeout = ?self.timeout, "summary generation timed out");
                UNAVAILABLE_TEXT.to_string()
            }
        }
    }
}
