use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use metrics::counter;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::command::Category;
use crate::dispatch::Dispatcher;
use crate::signature::{verify_signature, SIGNATURE_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// Auth token used to check inbound signatures; `None` skips the check.
    pub signature_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            signature_key: None,
        }
    }

    pub fn with_signature_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.signature_key = Some(key.into());
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(webhook))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Inbound callback as posted by the chat platform. Only the fields the bot
/// reads are modelled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    pub event: String,
    #[serde(default)]
    pub sender: Option<EventSender>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EventSender {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub text: Option<String>,
}

impl InboundEvent {
    pub fn is_message(&self) -> bool {
        self.event == "message"
    }

    /// `(sender id, text)` when both are present and non-empty.
    pub fn sender_and_text(&self) -> Option<(&str, &str)> {
        let id = self.sender.as_ref().map(|s| s.id.as_str()).filter(|s| !s.is_empty())?;
        let text = self.message.as_ref().and_then(|m| m.text.as_deref())?;
        Some((id, text))
    }
}

fn event_label(kind: &str) -> &'static str {
    match kind {
        "message" => "message",
        "webhook" => "webhook",
        "subscribed" => "subscribed",
        "unsubscribed" => "unsubscribed",
        "conversation_started" => "conversation_started",
        "delivered" => "delivered",
        "seen" => "seen",
        "failed" => "failed",
        _ => "other",
    }
}

/// Always 200 once the request got past the signature check, so the platform
/// never redelivers. Recognized commands return before any upstream call.
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if let Some(key) = state.signature_key.as_deref() {
        let sig = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(key, &body, sig) {
            warn!(target: "webhook", "rejecting callback with bad or missing signature");
            return StatusCode::FORBIDDEN;
        }
    }

    let event: InboundEvent = match serde_json::from_slice(&body) {
        Ok(ev) => ev,
        Err(e) => {
            counter!("webhook_events_total", "event" => "malformed").increment(1);
            warn!(target: "webhook", error = %e, bytes = body.len(), "unparseable callback; acknowledging");
            return StatusCode::OK;
        }
    };
    counter!("webhook_events_total", "event" => event_label(&event.event)).increment(1);

    if !event.is_message() {
        debug!(target: "webhook", event = %event.event, "ignoring non-message callback");
        return StatusCode::OK;
    }

    let Some((sender, text)) = event.sender_and_text() else {
        warn!(target: "webhook", "message callback without sender id or text; acknowledging");
        return StatusCode::OK;
    };

    let category = Category::from_command(text);
    info!(
        target: "webhook",
        %sender,
        category = category.map(Category::as_str).unwrap_or("none"),
        "command received"
    );
    // A scheduled pipeline keeps running after this handle is dropped.
    let _ = state.dispatcher.dispatch(sender, category).await;

    StatusCode::OK
}
