use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use campus_bus::{OutboxEntry, OutboxStore};
use campus_teacher_schema::outbox_events;

/// Outbox storage over this service's `outbox_events` table.
#[derive(Clone)]
pub struct DbOutboxStore {
    pub db: DatabaseConnection,
}

impl OutboxStore for DbOutboxStore {
    async fn fetch_due(&self, limit: u64) -> anyhow::Result<Vec<OutboxEntry>> {
        let rows = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(Utc::now()))
            .order_by_asc(outbox_events::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("fetch due outbox events")?;
        Ok(rows
            .into_iter()
            .map(|m| OutboxEntry {
                id: m.id,
                kind: m.kind,
                payload: m.payload,
                idempotency_key: m.idempotency_key,
                attempts: m.attempts,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn mark_processed(&self, id: Uuid) -> anyhow::Result<()> {
        outbox_events::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event processed")?;
        Ok(())
    }

    async fn reschedule(
        &self,
        id: Uuid,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        error: &str,
    ) -> anyhow::Result<()> {
        outbox_events::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            next_attempt_at: Set(next_attempt_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("reschedule outbox event")?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, attempts: i32, error: &str) -> anyhow::Result<()> {
        outbox_events::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            failed_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event failed")?;
        Ok(())
    }
}
