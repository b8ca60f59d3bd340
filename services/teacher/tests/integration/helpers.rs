//! In-memory repository backing the usecase tests.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use campus_teacher::domain::repository::TeacherRepository;
use campus_teacher::domain::types::{OutboxEvent, Teacher};
use campus_teacher::error::TeacherServiceError;

#[derive(Clone, Default)]
pub struct MockDb {
    pub teachers: Arc<Mutex<Vec<Teacher>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl TeacherRepository for MockDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, TeacherServiceError> {
        Ok(self
            .teachers
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, TeacherServiceError> {
        Ok(self
            .teachers
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Teacher>, TeacherServiceError> {
        let mut teachers = self.teachers.lock().unwrap().clone();
        teachers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(teachers)
    }

    async fn create_with_outbox(
        &self,
        teacher: &Teacher,
        event: &OutboxEvent,
    ) -> Result<(), TeacherServiceError> {
        self.teachers.lock().unwrap().push(teacher.clone());
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }
}
