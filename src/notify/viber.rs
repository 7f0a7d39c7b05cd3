// src/notify/viber.rs
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Keyboard, Notifier, OutboundMessage};
use crate::config::settings::ViberSettings;
use crate::text::truncate_chars;

pub const AUTH_HEADER: &str = "X-Viber-Auth-Token";
/// Lowest client API version that renders custom keyboards.
pub const MIN_API_VERSION: u8 = 7;
/// Platform cap on text message length.
pub const MAX_TEXT_CHARS: usize = 7000;

#[derive(Clone)]
pub struct ViberNotifier {
    endpoint: String,
    auth_token: String,
    sender_name: String,
    client: Client,
    timeout: Duration,
}

impl ViberNotifier {
    pub fn new(settings: &ViberSettings, auth_token: String) -> Self {
        Self {
            endpoint: format!("{}/send_message", settings.base_url.trim_end_matches('/')),
            auth_token,
            sender_name: settings.sender_name.clone(),
            client: Client::new(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct SenderInfo<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    receiver: &'a str,
    min_api_version: u8,
    sender: SenderInfo<'a>,
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyboard: Option<&'a Keyboard>,
}

#[derive(Deserialize)]
struct SendResponse {
    status: i64,
    #[serde(default)]
    status_message: String,
}

#[async_trait::async_trait]
impl Notifier for ViberNotifier {
    async fn send(&self, msg: &OutboundMessage) -> Result<()> {
        let mut text = msg.text.clone();
        truncate_chars(&mut text, MAX_TEXT_CHARS);

        let payload = SendMessage {
            receiver: &msg.receiver,
            min_api_version: MIN_API_VERSION,
            sender: SenderInfo {
                name: &self.sender_name,
            },
            kind: "text",
            text: &text,
            keyboard: msg.keyboard.as_ref(),
        };

        let rsp = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(AUTH_HEADER, &self.auth_token)
            .json(&payload)
            .send()
            .await
            .context("viber post")?
            .error_for_status()
            .context("viber non-2xx")?;

        // The platform reports most failures in-band with HTTP 200.
        let body: SendResponse = rsp.json().await.context("viber response decode")?;
        if body.status != 0 {
            return Err(anyhow!(
                "viber rejected message: status={} ({})",
                body.status,
                body.status_message
            ));
        }
        Ok(())
    }
}
