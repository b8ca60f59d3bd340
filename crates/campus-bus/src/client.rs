use std::collections::HashMap;

use deadpool_redis::redis::cmd;
use deadpool_redis::Pool;
use tracing::debug;

use campus_events::EventEnvelope;

use crate::error::BusError;
use crate::wire::{entry_fields, FIELD_ERROR};

/// Handle to the shared event stream.
///
/// Owned and injected: services build one from their Redis pool at startup
/// and pass clones to whatever needs to publish. Cloning is cheap (pool
/// handle + stream name).
#[derive(Clone)]
pub struct BusClient {
    pool: Pool,
    stream: String,
}

impl BusClient {
    pub fn open(pool: Pool, stream: impl Into<String>) -> Self {
        Self {
            pool,
            stream: stream.into(),
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn dead_letter_stream(&self) -> String {
        format!("{}:dead", self.stream)
    }

    pub(crate) fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Publish an envelope. The returned stream entry id is the broker's
    /// confirmation that the entry is durable.
    pub async fn publish(&self, envelope: &EventEnvelope) -> Result<String, BusError> {
        self.publish_with_attempts(envelope, 0).await
    }

    pub(crate) async fn publish_with_attempts(
        &self,
        envelope: &EventEnvelope,
        attempts: u32,
    ) -> Result<String, BusError> {
        let fields = entry_fields(envelope, attempts)?;
        let mut conn = self.pool.get().await?;
        let mut xadd = cmd("XADD");
        xadd.arg(&self.stream).arg("*");
        for (name, value) in &fields {
            xadd.arg(name).arg(value);
        }
        let entry_id: String = xadd.query_async(&mut conn).await?;
        debug!(
            stream = %self.stream,
            routing_key = %envelope.routing_key,
            event_id = %envelope.event_id,
            entry_id = %entry_id,
            "published event"
        );
        Ok(entry_id)
    }

    /// Park an envelope on the dead-letter stream with the final error.
    pub(crate) async fn publish_dead(
        &self,
        envelope: &EventEnvelope,
        attempts: u32,
        error: &str,
    ) -> Result<(), BusError> {
        let mut fields = entry_fields(envelope, attempts)?;
        fields.push((FIELD_ERROR, error.to_owned()));
        let mut conn = self.pool.get().await?;
        let mut xadd = cmd("XADD");
        xadd.arg(self.dead_letter_stream()).arg("*");
        for (name, value) in &fields {
            xadd.arg(name).arg(value);
        }
        let _: String = xadd.query_async(&mut conn).await?;
        Ok(())
    }

    /// Park a raw entry that could not even be decoded into an envelope.
    pub(crate) async fn dead_letter_raw(
        &self,
        fields: &HashMap<String, String>,
        error: &str,
    ) -> Result<(), BusError> {
        let mut conn = self.pool.get().await?;
        let mut xadd = cmd("XADD");
        xadd.arg(self.dead_letter_stream()).arg("*");
        for (name, value) in fields {
            xadd.arg(name).arg(value);
        }
        xadd.arg(FIELD_ERROR).arg(error);
        let _: String = xadd.query_async(&mut conn).await?;
        Ok(())
    }

    /// Create the consumer group if it does not exist yet. Idempotent.
    pub async fn ensure_group(&self, group: &str) -> Result<(), BusError> {
        let mut conn = self.pool.get().await?;
        let result: Result<String, deadpool_redis::redis::RedisError> = cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.stream)
            .arg(group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) async fn ack(&self, group: &str, entry_id: &str) -> Result<(), BusError> {
        let mut conn = self.pool.get().await?;
        let _: i64 = cmd("XACK")
            .arg(&self.stream)
            .arg(group)
            .arg(entry_id)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
