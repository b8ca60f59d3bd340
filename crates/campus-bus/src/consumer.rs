use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use deadpool_redis::redis::cmd;
use tracing::{debug, info, warn};
use uuid::Uuid;

use campus_events::EventEnvelope;

use crate::client::BusClient;
use crate::error::BusError;
use crate::wire::parse_fields;

/// Per-consumer tuning.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Consumer group — one durable queue per service.
    pub group: String,
    /// Consumer name within the group. Unique per process so crashed
    /// instances leave identifiable pending entries behind.
    pub consumer: String,
    /// Max unacked deliveries fetched per read (backpressure bound).
    pub prefetch: usize,
    /// Blocking-read timeout in milliseconds.
    pub block_ms: u64,
    /// Total delivery attempts before an entry is dead-lettered.
    pub max_attempts: u32,
}

impl ConsumerConfig {
    pub fn new(group: impl Into<String>) -> Self {
        let group = group.into();
        Self {
            consumer: format!("{group}-{}", Uuid::new_v4()),
            group,
            prefetch: 10,
            block_ms: 5000,
            max_attempts: 5,
        }
    }
}

/// One delivery handed to the handler.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub envelope: EventEnvelope,
    /// Failed handler runs so far (0 on first delivery).
    pub attempts: u32,
}

type RawEntry = (String, HashMap<String, String>);

enum FailureAction {
    Retry(u32),
    DeadLetter(u32),
}

fn after_failure(attempts: u32, max_attempts: u32) -> FailureAction {
    let next = attempts + 1;
    if next >= max_attempts {
        FailureAction::DeadLetter(next)
    } else {
        FailureAction::Retry(next)
    }
}

/// Reads the shared stream through a consumer group and drives a handler.
///
/// Acks strictly after the handler returns `Ok` — an in-flight entry stays
/// pending in the group across a crash and is redelivered on restart.
/// Handler failures re-publish the envelope with a bumped attempt counter
/// (and ack the original) until the budget is spent, then dead-letter it.
pub struct BusConsumer {
    client: BusClient,
    config: ConsumerConfig,
}

impl BusConsumer {
    pub fn new(client: BusClient, config: ConsumerConfig) -> Self {
        Self { client, config }
    }

    pub async fn run<F, Fut>(&self, handler: F) -> Result<(), BusError>
    where
        F: Fn(Delivery) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        self.client.ensure_group(&self.config.group).await?;
        info!(
            stream = %self.client.stream(),
            group = %self.config.group,
            consumer = %self.config.consumer,
            "bus consumer started"
        );

        loop {
            let batch = match self.read_batch().await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(error = %e, group = %self.config.group, "bus read failed, backing off");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };
            for (entry_id, fields) in batch {
                if let Err(e) = self.process(&handler, &entry_id, &fields).await {
                    // Redis hiccup mid-entry; leave it pending for redelivery.
                    warn!(error = %e, entry_id = %entry_id, "failed to settle delivery");
                }
            }
        }
    }

    async fn read_batch(&self) -> Result<Vec<RawEntry>, BusError> {
        let mut conn = self.client.pool().get().await?;
        let reply: Option<Vec<(String, Vec<RawEntry>)>> = cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.group)
            .arg(&self.config.consumer)
            .arg("COUNT")
            .arg(self.config.prefetch)
            .arg("BLOCK")
            .arg(self.config.block_ms)
            .arg("STREAMS")
            .arg(self.client.stream())
            .arg(">")
            .query_async(&mut conn)
            .await?;
        Ok(reply
            .into_iter()
            .flatten()
            .flat_map(|(_, entries)| entries)
            .collect())
    }

    async fn process<F, Fut>(
        &self,
        handler: &F,
        entry_id: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), BusError>
    where
        F: Fn(Delivery) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let (envelope, attempts) = match parse_fields(fields) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(entry_id = %entry_id, error = %e, "dead-lettering undecodable entry");
                self.client.dead_letter_raw(fields, &e.to_string()).await?;
                return self.client.ack(&self.config.group, entry_id).await;
            }
        };

        let delivery = Delivery {
            envelope: envelope.clone(),
            attempts,
        };
        match handler(delivery).await {
            Ok(()) => {
                debug!(
                    entry_id = %entry_id,
                    event_id = %envelope.event_id,
                    routing_key = %envelope.routing_key,
                    "delivery handled"
                );
            }
            Err(e) => match after_failure(attempts, self.config.max_attempts) {
                FailureAction::Retry(next) => {
                    warn!(
                        event_id = %envelope.event_id,
                        routing_key = %envelope.routing_key,
                        attempts = next,
                        error = %e,
                        "handler failed, re-publishing for retry"
                    );
                    self.client.publish_with_attempts(&envelope, next).await?;
                }
                FailureAction::DeadLetter(next) => {
                    warn!(
                        event_id = %envelope.event_id,
                        routing_key = %envelope.routing_key,
                        attempts = next,
                        error = %e,
                        "attempt budget spent, dead-lettering"
                    );
                    self.client
                        .publish_dead(&envelope, next, &e.to_string())
                        .await?;
                }
            },
        }
        self.client.ack(&self.config.group, entry_id).await
    }
}
