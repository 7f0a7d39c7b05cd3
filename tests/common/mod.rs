// tests/common/mod.rs
//
// Recording stubs for the three collaborator seams, plus a tiny helper that
// serves an axum Router on an ephemeral port to stand in for a provider.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use viber_news_bot::command::Category;
use viber_news_bot::config::PromptStyle;
use viber_news_bot::news::{FetchError, Headline, NewsSource, Retriever};
use viber_news_bot::notify::{Notifier, OutboundMessage, Outbox};
use viber_news_bot::summarize::{Summarizer, TextGenerator};
use viber_news_bot::{Dispatcher, Pipeline};

// ---------- news ----------

pub struct StubNews {
    headlines: Vec<Headline>,
    fail: bool,
    delay: Duration,
    pub calls: Mutex<Vec<Category>>,
    pub completed: AtomicUsize,
    running: AtomicUsize,
    pub max_running: AtomicUsize,
}

impl StubNews {
    pub fn with_articles(n: usize) -> Self {
        Self {
            headlines: (1..=n)
                .map(|i| Headline::new(&format!("Headline {i}"), &format!("Source {i}")).unwrap())
                .collect(),
            fail: false,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_articles(0)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait::async_trait]
impl NewsSource for StubNews {
    async fn top_headlines(&self, category: Category) -> Result<Vec<Headline>, FetchError> {
        self.calls.lock().push(category);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.headlines.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

// ---------- summarizer ----------

pub struct StubGenerator {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait::async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

// ---------- notifier ----------

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.text.clone()).collect()
    }

    /// Poll until at least `n` messages were recorded; panics after `within`.
    pub async fn wait_for(&self, n: usize, within: Duration) -> Vec<OutboundMessage> {
        let deadline = Instant::now() + within;
        loop {
            let got = self.messages();
            if got.len() >= n {
                return got;
            }
            assert!(
                Instant::now() < deadline,
                "expected {n} messages, got {}: {got:?}",
                got.len()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, msg: &OutboundMessage) -> anyhow::Result<()> {
        self.sent.lock().push(msg.clone());
        if self.fail {
            anyhow::bail!("simulated push failure");
        }
        Ok(())
    }
}

// ---------- wiring ----------

pub struct Harness {
    pub news: Arc<StubNews>,
    pub generator: Arc<StubGenerator>,
    pub notifier: Arc<RecordingNotifier>,
    pub dispatcher: Dispatcher,
}

pub fn harness(news: StubNews, generator: StubGenerator) -> Harness {
    harness_with(news, generator, RecordingNotifier::default(), 8)
}

pub fn harness_with(
    news: StubNews,
    generator: StubGenerator,
    notifier: RecordingNotifier,
    max_in_flight: usize,
) -> Harness {
    let news = Arc::new(news);
    let generator = Arc::new(generator);
    let notifier = Arc::new(notifier);

    let pipeline = Pipeline::new(
        Retriever::new(news.clone(), 5, Duration::from_secs(2)),
        Summarizer::new(generator.clone(), PromptStyle::Structured, Duration::from_secs(2)),
        Outbox::new(notifier.clone()),
    );
    Harness {
        news,
        generator,
        notifier,
        dispatcher: Dispatcher::new(pipeline, max_in_flight),
    }
}

// ---------- fake upstream ----------

pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });
    format!("http://{addr}")
}
