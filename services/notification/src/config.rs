use serde::Deserialize;

use campus_core::config::Config;

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    /// Sender address, e.g. `Campus <no-reply@campus.test>`.
    pub email_from: String,
    /// External base URL links in outgoing mail point at.
    pub public_base_url: String,
    pub redis_url: String,
    #[serde(default = "default_event_stream")]
    pub event_stream: String,
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,
    #[serde(default = "default_port")]
    pub notification_port: u16,
}

impl Config for NotificationConfig {}

fn default_smtp_port() -> u16 {
    587
}

fn default_event_stream() -> String {
    "campus.events".to_owned()
}

fn default_consumer_group() -> String {
    "notification-service".to_owned()
}

fn default_port() -> u16 {
    5503
}
