// src/notify/mod.rs
pub mod keyboard;
pub mod viber;

use std::sync::Arc;

use anyhow::Result;
use metrics::counter;
use tracing::{debug, warn};

pub use keyboard::{category_menu, Button, Keyboard};
pub use viber::ViberNotifier;

/// One push message to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub receiver: String,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(receiver: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, msg: &OutboundMessage) -> Result<()>;
}

pub type DynNotifier = Arc<dyn Notifier>;

/// Fire-and-forget wrapper: logs failed pushes instead of returning them.
#[derive(Clone)]
pub struct Outbox {
    inner: DynNotifier,
}

impl Outbox {
    pub fn new(inner: DynNotifier) -> Self {
        Self { inner }
    }

    pub async fn deliver(&self, msg: OutboundMessage) {
        match self.inner.send(&msg).await {
            Ok(()) => debug!(target: "notify", receiver = %msg.receiver, "message pushed"),
            Err(e) => {
                counter!("notify_failures_total").increment(1);
                warn!(target: "notify", receiver = %msg.receiver, error = %e, "push failed; dropping message");
            }
        }
    }
}
