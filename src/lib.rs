//! Posts messages to a Discord channel through an incoming webhook, keeping a
//! minimum delay between sends with a timestamp persisted across runs.

pub mod config;
pub mod cooldown;
pub mod discord;
pub mod log;
pub mod message;
pub mod state;
pub mod transport;

pub use config::{ConfigurationError, CooldownOrdering, NotifierConfig};
pub use discord::{Delivery, DeliveryFailure, WebhookNotifier};
pub use message::{Author, EmbedSpec, FieldSpec, Footer, MessageSpec};
