use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Discord incoming webhook. `None` disables delivery; every handled
    /// event then answers with a delivery failure.
    pub discord_webhook_url: Option<String>,
    /// Outbound request timeout. Unset means the HTTP client default.
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

/// Read config from the process environment. `.env` is applied by the
/// binary before logging starts, so it is not re-read here.
pub fn load() -> anyhow::Result<Config> {
    Ok(from_lookup(|key| std::env::var(key).ok()))
}

/// Build a config from an arbitrary key lookup (the process environment in `load`).
pub fn from_lookup<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let discord_webhook_url = lookup("DISCORD_WEBHOOK_URL")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    if discord_webhook_url.is_none() {
        tracing::warn!("DISCORD_WEBHOOK_URL is not set; deployment notifications will fail to send");
    }

    Config {
        port: lookup("RELAY_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT),
        discord_webhook_url,
        http_timeout_secs: lookup("RELAY_HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
    }
}
