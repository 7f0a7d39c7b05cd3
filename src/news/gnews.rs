// src/news/gnews.rs
use std::time::Duration;

use serde::Deserialize;

use super::{FetchError, Headline, NewsSource};
use crate::command::Category;
use crate::config::settings::NewsSettings;
use crate::text::truncate_chars;

/// GNews `top-headlines` client.
pub struct GNewsSource {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    max: u8,
}

#[derive(Debug, Deserialize)]
struct Resp {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: String,
    #[serde(default)]
    source: ArticleSource,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: String,
}

impl GNewsSource {
    pub fn new(settings: &NewsSettings, api_key: Option<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("viber-news-bot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: settings.language.clone(),
            max: settings.max_articles,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/top-headlines", self.base_url)
    }
}

#[async_trait::async_trait]
impl NewsSource for GNewsSource {
    async fn top_headlines(&self, category: Category) -> Result<Vec<Headline>, FetchError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(FetchError::MissingKey);
        };

        let max = self.max.to_string();
        let resp = self
            .http
            .get(self.endpoint())
            .query(&[
                ("category", category.provider_topic()),
                ("lang", self.language.as_str()),
                ("max", max.as_str()),
                ("apikey", key),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            truncate_chars(&mut body, 200);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        let parsed: Resp =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| Headline::new(&a.title, &a.source.name))
            .take(usize::from(self.max))
            .collect())
    }

    fn name(&self) -> &'static str {
        "gnews"
    }
}
