//! deploy-relay — forwards Vercel deployment webhooks to a Discord channel.
//!
//! Library crate shared by the binary and the integration tests in `tests/`.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod notification;

use notification::discord::{DiscordNotifier, Notifier};

/// Shared application state passed to handlers. Immutable after startup.
pub struct AppState {
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// State backed by a real Discord notifier built from `cfg`.
    pub fn from_config(cfg: &config::Config) -> anyhow::Result<Self> {
        let notifier = DiscordNotifier::new(cfg.discord_webhook_url.clone(), cfg.http_timeout())?;
        Ok(Self::new(Arc::new(notifier)))
    }
}
