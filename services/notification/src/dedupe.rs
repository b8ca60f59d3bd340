use deadpool_redis::Pool;
use deadpool_redis::redis::cmd;
use tracing::warn;
use uuid::Uuid;

/// How long a handled event id is remembered (1 day).
const DEDUPE_TTL_SECS: u64 = 86_400;

/// Event-id claim seam; the consumer is tested against an in-memory impl.
pub trait Deduplicator: Send + Sync + Clone {
    /// Claim the event id. `true` if it was not already claimed within the
    /// TTL window.
    async fn first_seen(&self, event_id: Uuid) -> bool;

    /// Give back a claim whose guarded work failed, so the retry delivery
    /// is not treated as a duplicate.
    async fn release(&self, event_id: Uuid);
}

/// Event-id deduplication over Redis `SET NX`.
///
/// At-least-once delivery means the same `event_id` can arrive more than once
/// (relay retry, consumer retry, crash between send and ack). One mail per id
/// within the TTL window is enough. Fails open: if Redis is unreachable the
/// event counts as first-seen, trading a possible duplicate mail for not
/// dropping one.
#[derive(Clone)]
pub struct RedisDeduplicator {
    pool: Pool,
}

impl RedisDeduplicator {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn dedupe_key(event_id: Uuid) -> String {
    format!("dedupe:notification:{event_id}")
}

impl Deduplicator for RedisDeduplicator {
    async fn first_seen(&self, event_id: Uuid) -> bool {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "dedupe check unavailable, assuming first delivery");
                return true;
            }
        };
        let reply: Result<Option<String>, deadpool_redis::redis::RedisError> = cmd("SET")
            .arg(dedupe_key(event_id))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(DEDUPE_TTL_SECS)
            .query_async(&mut conn)
            .await;
        match reply {
            Ok(set) => set.is_some(),
            Err(e) => {
                warn!(error = %e, "dedupe check failed, assuming first delivery");
                true
            }
        }
    }

    async fn release(&self, event_id: Uuid) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, event_id = %event_id, "failed to release dedupe claim");
                return;
            }
        };
        let reply: Result<u64, deadpool_redis::redis::RedisError> = cmd("DEL")
            .arg(dedupe_key(event_id))
            .query_async(&mut conn)
            .await;
        if let Err(e) = reply {
            warn!(error = %e, event_id = %event_id, "failed to release dedupe claim");
        }
    }
}
