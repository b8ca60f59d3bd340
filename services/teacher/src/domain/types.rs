use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Teacher record owned by this service.
#[derive(Debug, Clone)]
pub struct Teacher {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outbox event written in the same transaction as the rows it describes.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}
