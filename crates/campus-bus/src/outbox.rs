//! Transactional-outbox relay.
//!
//! Producing services write business rows and outbox rows in one local
//! transaction; a relay worker publishes committed rows afterwards. The
//! outbox row id doubles as the wire `event_id`, so relay retries and broker
//! redeliveries dedupe to the same id downstream.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};
use uuid::Uuid;

use campus_events::{EventEnvelope, SCHEMA_VERSION};

use crate::client::BusClient;

/// A due outbox row as the relay reads it. `kind` is the routing key.
#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

/// Storage side of the outbox, implemented per service over its own table.
pub trait OutboxStore: Send + Sync {
    /// Rows with no `processed_at`/`failed_at` whose `next_attempt_at` is due,
    /// oldest first.
    async fn fetch_due(&self, limit: u64) -> anyhow::Result<Vec<OutboxEntry>>;

    async fn mark_processed(&self, id: Uuid) -> anyhow::Result<()>;

    /// Record a failed publish and push `next_attempt_at` into the future.
    async fn reschedule(
        &self,
        id: Uuid,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        error: &str,
    ) -> anyhow::Result<()>;

    /// Give up on a row (sets `failed_at`); needs operator attention.
    async fn mark_failed(&self, id: Uuid, attempts: i32, error: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Service name stamped on envelopes as `source`.
    pub source: String,
    pub poll_interval: Duration,
    pub batch_size: u64,
    pub max_attempts: i32,
}

impl RelayConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            poll_interval: Duration::from_secs(2),
            batch_size: 50,
            max_attempts: 10,
        }
    }
}

fn backoff_delay(attempts: i32) -> chrono::Duration {
    // 5s, 10s, 20s, ... capped at 10 minutes.
    let exp = attempts.saturating_sub(1).clamp(0, 16) as u32;
    let secs = (5i64 << exp).min(600);
    chrono::Duration::seconds(secs)
}

fn envelope_for(entry: &OutboxEntry, source: &str) -> EventEnvelope {
    EventEnvelope {
        event_id: entry.id,
        schema_version: SCHEMA_VERSION,
        source: source.to_owned(),
        occurred_at: entry.created_at,
        routing_key: entry.kind.clone(),
        payload: entry.payload.clone(),
    }
}

/// Poll-publish-mark worker. One per producing service, spawned at startup.
pub struct OutboxRelay<S: OutboxStore> {
    store: S,
    client: BusClient,
    config: RelayConfig,
}

impl<S: OutboxStore> OutboxRelay<S> {
    pub fn new(store: S, client: BusClient, config: RelayConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    pub async fn run(&self) {
        loop {
            if let Err(e) = self.drain_once().await {
                error!(error = %e, source = %self.config.source, "outbox drain failed");
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// One poll cycle. Returns the number of rows published.
    pub async fn drain_once(&self) -> anyhow::Result<usize> {
        let due = self.store.fetch_due(self.config.batch_size).await?;
        let mut published = 0;
        for entry in due {
            let envelope = envelope_for(&entry, &self.config.source);
            match self.client.publish(&envelope).await {
                Ok(entry_id) => {
                    self.store.mark_processed(entry.id).await?;
                    debug!(
                        outbox_id = %entry.id,
                        routing_key = %entry.kind,
                        entry_id = %entry_id,
                        "outbox event published"
                    );
                    published += 1;
                }
                Err(e) => {
                    let attempts = entry.attempts + 1;
                    let reason = e.to_string();
                    if attempts >= self.config.max_attempts {
                        warn!(
                            outbox_id = %entry.id,
                            attempts,
                            error = %reason,
                            "outbox event exhausted attempts"
                        );
                        self.store.mark_failed(entry.id, attempts, &reason).await?;
                    } else {
                        self.store
                            .reschedule(
                                entry.id,
                                attempts,
                                Utc::now() + backoff_delay(attempts),
                                &reason,
                            )
                            .await?;
                    }
                }
            }
        }
        Ok(published)
    }
}
