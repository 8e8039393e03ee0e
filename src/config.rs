use crate::cooldown::DEFAULT_COOLDOWN;
use crate::state::DEFAULT_STATE_FILE;
use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// When a send attempt claims its cooldown slot relative to endpoint validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CooldownOrdering {
    /// Every attempt consumes the cooldown, including ones rejected for bad configuration.
    #[default]
    BeforeValidation,
    /// Rejected attempts return immediately and leave the cooldown untouched.
    AfterValidation,
}

impl FromStr for CooldownOrdering {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before-validation" => Ok(Self::BeforeValidation),
            "after-validation" => Ok(Self::AfterValidation),
            other => Err(anyhow!("Unknown cooldown ordering: {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    /// Kept as given. It is only checked when a message is sent.
    pub webhook_url: String,
    pub cooldown: Duration,
    pub verify_tls: bool,
    pub ordering: CooldownOrdering,
    pub timeout: Option<Duration>,
}

impl NotifierConfig {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
            cooldown: DEFAULT_COOLDOWN,
            verify_tls: true,
            ordering: CooldownOrdering::default(),
            timeout: None,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_ordering(mut self, ordering: CooldownOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid Webhook URL: none configured")]
    EmptyWebhookUrl,
    // The URL itself embeds the webhook token, so it is never echoed back.
    #[error("Invalid Webhook URL: {0}")]
    InvalidWebhookUrl(String),
}

pub fn validate_webhook_url(webhook_url: &str) -> Result<Url, ConfigurationError> {
    let webhook_url = webhook_url.trim();

    if webhook_url.is_empty() {
        return Err(ConfigurationError::EmptyWebhookUrl);
    }

    let url = Url::parse(webhook_url)
        .map_err(|e| ConfigurationError::InvalidWebhookUrl(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::InvalidWebhookUrl(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigurationError::InvalidWebhookUrl(
            "missing host".to_string(),
        ));
    }

    Ok(url)
}

pub struct Config {
    pub notifier: NotifierConfig,
    pub state_file: PathBuf,
}

pub fn get_config() -> Result<Config> {
    config_from(|key| std::env::var(key).ok())
}

fn config_from(var: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let webhook_url = var("DISCORD_WEBHOOK_URL").context("DISCORD_WEBHOOK_URL is not set")?;

    let mut notifier = NotifierConfig::new(&webhook_url);

    if let Some(secs) = var("DISCORD_COOLDOWN_SECS") {
        let secs = secs
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Bad DISCORD_COOLDOWN_SECS: {:?}", secs))?;
        notifier.cooldown = Duration::from_secs(secs);
    }

    if let Some(verify) = var("DISCORD_VERIFY_TLS") {
        notifier.verify_tls = verify
            .trim()
            .parse::<bool>()
            .with_context(|| format!("Bad DISCORD_VERIFY_TLS: {:?}", verify))?;
    }

    if let Some(ordering) = var("DISCORD_COOLDOWN_ORDERING") {
        notifier.ordering = ordering.parse()?;
    }

    if let Some(secs) = var("DISCORD_TIMEOUT_SECS") {
        let secs = secs
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Bad DISCORD_TIMEOUT_SECS: {:?}", secs))?;
        notifier.timeout = Some(Duration::from_secs(secs));
    }

    let state_file = var("DISCORD_COOLDOWN_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

    Ok(Config {
        notifier,
        state_file,
    })
}
