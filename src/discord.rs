use crate::config::{validate_webhook_url, ConfigurationError, CooldownOrdering, NotifierConfig};
use crate::cooldown::{Clock, RateLimiter, SystemClock};
use crate::log::Logger;
use crate::message::MessageSpec;
use crate::state::TimestampStore;
use crate::transport::{ReqwestTransport, Response, Transport, TransportError};
use anyhow::Result;
use reqwest::Url;
use std::sync::Arc;

/// Discord answers a successful webhook execution with "204 No Content" and nothing else.
const SUCCESS_STATUS: u16 = 204;

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Delivered,
    NotDelivered(DeliveryFailure),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("HTTP status code: {status}, response: {body}")]
    Status { status: u16, body: String },
    #[error("HTTP transport error: {0}")]
    Transport(#[from] TransportError),
}

pub struct WebhookNotifier {
    config: NotifierConfig,
    limiter: RateLimiter,
    transport: Box<dyn Transport>,
    log: Arc<dyn Logger>,
}

impl WebhookNotifier {
    /// A notifier that talks to Discord over HTTPS and sleeps on the system clock.
    pub fn new(
        config: NotifierConfig,
        store: Arc<dyn TimestampStore>,
        log: Arc<dyn Logger>,
    ) -> Result<Self> {
        if !config.verify_tls {
            log.warning("TLS certificate verification is disabled for webhook requests");
        }

        let transport = ReqwestTransport::new(config.verify_tls, config.timeout)?;

        Ok(Self::with_parts(
            config,
            Box::new(transport),
            store,
            Arc::new(SystemClock),
            log,
        ))
    }

    pub fn with_parts(
        config: NotifierConfig,
        transport: Box<dyn Transport>,
        store: Arc<dyn TimestampStore>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Logger>,
    ) -> Self {
        let limiter = RateLimiter::new(config.cooldown, store, clock);

        Self {
            config,
            limiter,
            transport,
            log,
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Sends one message, waiting out the cooldown first.
    ///
    /// Only bad configuration is an `Err`. Anything that goes wrong on the wire is
    /// reported through the logger and returned as [`Delivery::NotDelivered`].
    pub fn send(&self, message: &MessageSpec) -> Result<Delivery, ConfigurationError> {
        let url = match self.config.ordering {
            CooldownOrdering::BeforeValidation => {
                self.limiter.acquire(self.log.as_ref());
                validate_webhook_url(&self.config.webhook_url)?
            }
            CooldownOrdering::AfterValidation => {
                let url = validate_webhook_url(&self.config.webhook_url)?;
                self.limiter.acquire(self.log.as_ref());
                url
            }
        };

        if message.is_empty() {
            self.log
                .warning("Message has neither content nor embeds, Discord will likely refuse it");
        }

        let delivery = match self.call_webhook(&url, message) {
            Ok(()) => {
                self.log.info("Message sent successfully!");
                Delivery::Delivered
            }
            Err(failure) => {
                self.log
                    .error(&format!("Failed to send message: {}", failure));
                Delivery::NotDelivered(failure)
            }
        };

        Ok(delivery)
    }

    fn call_webhook(&self, url: &Url, message: &MessageSpec) -> Result<(), DeliveryFailure> {
        match self.transport.post_json(url, message.to_payload())? {
            Response {
                status: SUCCESS_STATUS,
                ..
            } => Ok(()),
            Response { status, body } => Err(DeliveryFailure::Status { status, body }),
        }
    }
}
