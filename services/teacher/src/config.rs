use serde::Deserialize;

use campus_core::config::Config;

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherConfig {
    pub database_url: String,
    pub redis_url: String,
    pub access_token_secret: String,
    #[serde(default = "default_port")]
    pub teacher_port: u16,
    #[serde(default = "default_event_stream")]
    pub event_stream: String,
}

impl Config for TeacherConfig {}

fn default_port() -> u16 {
    5502
}

fn default_event_stream() -> String {
    "campus.events".to_owned()
}
