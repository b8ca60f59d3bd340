#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{OutboxEvent, Teacher};
use crate::error::TeacherServiceError;

/// Repository for teacher records.
pub trait TeacherRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, TeacherServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, TeacherServiceError>;

    async fn list(&self) -> Result<Vec<Teacher>, TeacherServiceError>;

    /// Insert a teacher and its `teacher.created` outbox event atomically
    /// (same transaction) — the account side only ever sees committed rows.
    async fn create_with_outbox(
        &self,
        teacher: &Teacher,
        event: &OutboxEvent,
    ) -> Result<(), TeacherServiceError>;
}
