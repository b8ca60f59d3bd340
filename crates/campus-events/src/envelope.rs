use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::{Event, RoutingKey};

/// Current schema version stamped on every envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Wire envelope around every published event.
///
/// `event_id` is the deduplication id: when an event comes out of a
/// transactional outbox it is the outbox row id, so redeliveries and relay
/// retries carry the same id end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub schema_version: u32,
    /// Service that produced the event (e.g. "teacher-service").
    pub source: String,
    pub occurred_at: DateTime<Utc>,
    pub routing_key: String,
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Wrap an event with a fresh random event id.
    pub fn new(source: impl Into<String>, event: &Event) -> Result<Self, serde_json::Error> {
        let (key, payload) = event.encode()?;
        Ok(Self {
            event_id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION,
            source: source.into(),
            occurred_at: Utc::now(),
            routing_key: key.as_str().to_owned(),
            payload,
        })
    }

    /// Override the event id (outbox relays use the outbox row id).
    pub fn with_event_id(mut self, event_id: Uuid) -> Self {
        self.event_id = event_id;
        self
    }

    /// Decode the payload into the event union.
    ///
    /// Returns `Ok(None)` for routing keys this platform version does not
    /// know; consumers ack and skip those.
    pub fn event(&self) -> Result<Option<Event>, serde_json::Error> {
        match RoutingKey::parse(&self.routing_key) {
            Some(key) => Event::decode(key, &self.payload).map(Some),
            None => Ok(None),
        }
    }
}
