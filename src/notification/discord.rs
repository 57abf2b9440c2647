use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info};

use super::embed::{Embed, WebhookMessage};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("DISCORD_WEBHOOK_URL is not configured")]
    NotConfigured,

    #[error("discord returned status {0}")]
    Status(StatusCode),

    #[error("discord request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Delivers one embed to a chat webhook. A single attempt per call.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, embed: &Embed) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    /// `timeout` of `None` leaves the reqwest default (no request timeout).
    pub fn new(webhook_url: Option<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("deploy-relay/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        Ok(Self {
            client: builder.build()?,
            webhook_url: webhook_url.filter(|u| !u.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, embed: &Embed) -> Result<(), NotifyError> {
        let url = match &self.webhook_url {
            Some(u) => u,
            None => {
                error!("DISCORD_WEBHOOK_URL is not set, cannot send notification");
                return Err(NotifyError::NotConfigured);
            }
        };

        // .json() sets content-type: application/json
        let resp = self
            .client
            .post(url)
            .json(&WebhookMessage::single(embed))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "error sending discord message");
                NotifyError::Transport(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            error!(status = %status, "failed to send discord message");
            return Err(NotifyError::Status(status));
        }

        info!(status = %status, title = %embed.title, "discord message sent");
        Ok(())
    }
}
