// src/news/mod.rs
//! Headline retrieval.
//!
//! [`NewsSource`] is the transport seam (one HTTP call, typed errors).
//! [`Retriever`] is the boundary the pipeline talks to: it never fails, it
//! only distinguishes "here is a batch" from "nothing usable".

pub mod gnews;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};

use crate::command::Category;
use crate::text::{normalize_text, with_full_stop};

pub use gnews::GNewsSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub source: String,
}

impl Headline {
    /// Normalized pair; `None` when the title is empty after cleanup.
    /// Titles keep their own punctuation.
    pub fn new(title: &str, source: &str) -> Option<Self> {
        let title = normalize_text(title);
        if title.is_empty() {
            return None;
        }
        let source = normalize_text(source);
        Some(Self { title, source })
    }

    pub fn to_line(&self) -> String {
        format!(
            "Title: {} Source: {}",
            with_full_stop(&self.title),
            with_full_stop(&self.source)
        )
    }
}

/// Ordered, non-empty headlines for one category and one retrieval instant.
#[derive(Debug, Clone)]
pub struct HeadlineBatch {
    pub category: Category,
    pub headlines: Vec<Headline>,
    pub fetched_at: DateTime<Utc>,
}

impl HeadlineBatch {
    /// Newline-joined `Title: <t>. Source: <s>.` lines.
    pub fn to_text_block(&self) -> String {
        self.headlines
            .iter()
            .map(Headline::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.headlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }
}

/// What the pipeline sees. Failure and "zero articles" are the same signal.
#[derive(Debug, Clone)]
pub enum NewsResult {
    Batch(HeadlineBatch),
    Empty,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("news API key not configured")]
    MissingKey,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response body could not be decoded: {0}")]
    Decode(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Up to the provider's cap of headlines for `category`, in provider order.
    async fn top_headlines(&self, category: Category) -> Result<Vec<Headline>, FetchError>;
    fn name(&self) -> &'static str;
}

pub type DynNewsSource = Arc<dyn NewsSource>;

#[derive(Clone)]
pub struct Retriever {
    source: DynNewsSource,
    max_articles: usize,
    timeout: Duration,
}

impl Retriever {
    pub fn new(source: DynNewsSource, max_articles: usize, timeout: Duration) -> Self {
        Self {
            source,
            max_articles: max_articles.max(1),
            timeout,
        }
    }

    pub async fn fetch(&self, category: Category) -> NewsResult {
        let provider = self.source.name();
        let outcome = match tokio::time::timeout(self.timeout, self.source.top_headlines(category)).await
        {
            Ok(res) => res,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(mut headlines) => {
                headlines.truncate(self.max_articles);
                if headlines.is_empty() {
                    counter!("news_fetch_total", "result" => "empty").increment(1);
                    info!(target: "news", provider, %category, "provider returned no articles");
                    return NewsResult::Empty;
                }
                counter!("news_fetch_total", "result" => "ok").increment(1);
                let batch = HeadlineBatch {
                    category,
                    headlines,
                    fetched_at: Utc::now(),
                };
                info!(
                    target: "news",
                    provider,
                    %category,
                    count = batch.len(),
                    fetched_at = %batch.fetched_at.to_rfc3339(),
                    "headlines fetched"
                );
                NewsResult::Batch(batch)
            }
            Err(e) => {
                counter!("news_fetch_total", "result" => "error").increment(1);
                warn!(target: "news", provider, %category, error = %e, "headline fetch failed");
                NewsResult::Empty
            }
        }
    }
}
