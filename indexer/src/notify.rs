//! Operator notifications over a plain webhook. Kept deliberately generic
//! (a bearer-authenticated JSON POST) rather than coupled to one chat
//! provider, so `set-webhook` can point at Telegram's bot API, Slack, or an
//! internal endpoint interchangeably.

use serde::Serialize;
use tracing::warn;

use crate::error::IndexerError;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub game: &'static str,
    pub draw_id: u64,
    pub event: &'static str,
    pub detail: String,
}

pub struct Notifier {
    client: reqwest::Client,
    url: Option<String>,
    token: Option<String>,
}

impl Notifier {
    pub fn new(url: Option<String>, token: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), url, token }
    }

    /// Best-effort: a webhook outage shouldn't stop the draw lifecycle, so
    /// failures are logged and swallowed rather than propagated.
    pub async fn send(&self, notification: &Notification) {
        let Some(url) = self.url.as_deref() else {
            return;
        };
        let mut request = self.client.post(url).json(notification);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Err(e) = request.send().await {
            warn!(error = %e, "webhook notification failed");
        }
    }

    pub async fn verify(&self) -> Result<(), IndexerError> {
        let Some(url) = self.url.as_deref() else {
            return Err(IndexerError::Config("no webhook url configured".to_string()));
        };
        let mut request = self.client.post(url).json(&Notification {
            game: "system",
            draw_id: 0,
            event: "webhook_configured",
            detail: "lotto-indexer connected".to_string(),
        });
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        request.send().await?;
        Ok(())
    }
}
