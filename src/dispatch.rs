// src/dispatch.rs
//! Command dispatch.
//!
//! Unknown commands get the help menu inline. Known categories are handed to a
//! detached tokio task that runs retrieve -> summarize -> notify on its own
//! schedule; the caller gets control back as soon as the task is spawned.
//!
//! Tasks share nothing mutable. The only common object is a semaphore that
//! caps how many pipelines run at once; tasks over the cap wait for a slot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use metrics::{counter, gauge};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::command::Category;
use crate::config::AppConfig;
use crate::news::{GNewsSource, NewsResult, Retriever};
use crate::notify::{category_menu, OutboundMessage, Outbox, ViberNotifier};
use crate::summarize::{DisabledGenerator, DynGenerator, GeminiGenerator, Summarizer};

pub const SEARCHING_TEXT: &str = "Ищу новости и готовлю ИИ-аналитика...";

pub fn help_text() -> String {
    let commands = Category::ALL
        .iter()
        .map(|c| c.command())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Доступные команды:\n{commands}\n\nИли выберите категорию на клавиатуре ниже.")
}

pub fn no_news_text(category: Category) -> String {
    format!(
        "Не удалось найти актуальные новости по категории '{}'.",
        category.label()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Summarized,
    NoNews,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Summarized => "summarized",
            Outcome::NoNews => "no_news",
        }
    }
}

/// The three collaborators one background run needs.
pub struct Pipeline {
    retriever: Retriever,
    summarizer: Summarizer,
    outbox: Outbox,
}

impl Pipeline {
    pub fn new(retriever: Retriever, summarizer: Summarizer, outbox: Outbox) -> Self {
        Self {
            retriever,
            summarizer,
            outbox,
        }
    }

    /// Sends exactly two messages: the progress notice, then either the
    /// summary (or its fallback) or the no-news notice.
    pub async fn run(&self, sender: &str, category: Category) -> Outcome {
        self.outbox
            .deliver(OutboundMessage::text(sender, SEARCHING_TEXT))
            .await;

        let batch = match self.retriever.fetch(category).await {
            NewsResult::Batch(batch) => batch,
            NewsResult::Empty => {
                self.outbox
                    .deliver(OutboundMessage::text(sender, no_news_text(category)))
                    .await;
                return Outcome::NoNews;
            }
        };

        let block = batch.to_text_block();
        let summary = self.summarizer.summarize(Some(&block)).await;
        self.outbox
            .deliver(OutboundMessage::text(sender, summary))
            .await;
        Outcome::Summarized
    }
}

/// What `dispatch` did with an event.
#[derive(Debug)]
pub enum Dispatch {
    /// Background task spawned; the handle is only awaited by tests.
    Scheduled(JoinHandle<()>),
    /// Help menu sent inline.
    Menu,
}

#[derive(Clone)]
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(pipeline: Pipeline, max_in_flight: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Wire the production clients from configuration.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let s = &cfg.settings;

        let news = GNewsSource::new(&s.news, cfg.secrets.news_api_key.clone())?;
        let retriever = Retriever::new(
            Arc::new(news),
            usize::from(s.news.max_articles),
            Duration::from_secs(s.news.timeout_secs),
        );

        let generator: DynGenerator = match &cfg.secrets.gemini_api_key {
            Some(key) => Arc::new(GeminiGenerator::new(&s.summarizer, key.clone())?),
            None => Arc::new(DisabledGenerator),
        };
        let summarizer = Summarizer::new(
            generator,
            s.summarizer.style,
            Duration::from_secs(s.summarizer.timeout_secs),
        );

        let notifier = ViberNotifier::new(&s.viber, cfg.secrets.viber_auth_token.clone());
        let outbox = Outbox::new(Arc::new(notifier));

        Ok(Self::new(
            Pipeline::new(retriever, summarizer, outbox),
            s.dispatch.max_in_flight,
        ))
    }

    pub async fn dispatch(&self, sender: &str, command: Option<Category>) -> Dispatch {
        match command {
            None => {
                counter!("dispatch_total", "path" => "menu").increment(1);
                let msg = OutboundMessage::text(sender, help_text()).with_keyboard(category_menu());
                self.pipeline.outbox.deliver(msg).await;
                Dispatch::Menu
            }
            Some(category) => {
                counter!("dispatch_total", "path" => "pipeline").increment(1);
                Dispatch::Scheduled(self.spawn(sender.to_string(), category))
            }
        }
    }

    fn spawn(&self, sender: String, category: Category) -> JoinHandle<()> {
        let pipeline = Arc::clone(&self.pipeline);
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    error!(target: "dispatch", %sender, %category, "pipeline semaphore closed: {err}");
                    return;
                }
            };
            let _in_flight = InFlight::enter();

            info!(target: "dispatch", %sender, %category, "pipeline started");
            let outcome = pipeline.run(&sender, category).await;
            counter!("pipeline_runs_total", "outcome" => outcome.as_str()).increment(1);
            info!(target: "dispatch", %sender, %category, outcome = outcome.as_str(), "pipeline finished");
        })
    }
}

/// Keeps `pipeline_in_flight` honest even if a run unwinds.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!("pipeline_in_flight").increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!("pipeline_in_flight").decrement(1.0);
    }
}
