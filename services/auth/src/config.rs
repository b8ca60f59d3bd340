use serde::Deserialize;

use campus_core::config::Config;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub database_url: String,
    pub redis_url: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub verification_token_secret: String,
    pub cookie_domain: String,
    #[serde(default = "default_port")]
    pub auth_port: u16,
    #[serde(default = "default_event_stream")]
    pub event_stream: String,
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,
}

impl Config for AuthConfig {}

fn default_port() -> u16 {
    5501
}

fn default_event_stream() -> String {
    "campus.events".to_owned()
}

fn default_consumer_group() -> String {
    "auth-service".to_owned()
}
