use chrono::Utc;
use uuid::Uuid;

use campus_events::{Event, TeacherCreated};

use crate::domain::repository::TeacherRepository;
use crate::domain::types::{OutboxEvent, Teacher};
use crate::error::TeacherServiceError;

pub struct CreateTeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Create a teacher and queue the `teacher.created` event in one transaction.
/// The auth service provisions the login account off that event; nothing here
/// talks to auth directly.
pub struct CreateTeacherUseCase<T: TeacherRepository> {
    pub teachers: T,
}

impl<T: TeacherRepository> CreateTeacherUseCase<T> {
    pub async fn execute(&self, input: CreateTeacherInput) -> Result<Teacher, TeacherServiceError> {
        if self.teachers.find_by_email(&input.email).await?.is_some() {
            return Err(TeacherServiceError::DuplicateEmail);
        }

        let now = Utc::now();
        let teacher = Teacher {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        };

        let event = creation_event(&teacher)?;
        self.teachers.create_with_outbox(&teacher, &event).await?;
        Ok(teacher)
    }
}

fn creation_event(teacher: &Teacher) -> Result<OutboxEvent, TeacherServiceError> {
    let event = Event::TeacherCreated(TeacherCreated {
        teacher_id: teacher.id.to_string(),
        email: teacher.email.clone(),
        first_name: teacher.first_name.clone(),
        last_name: teacher.last_name.clone(),
    });
    let (routing_key, payload) = event
        .encode()
        .map_err(|e| TeacherServiceError::Internal(e.into()))?;
    Ok(OutboxEvent {
        id: Uuid::new_v4(),
        kind: routing_key.as_str().to_owned(),
        payload,
        idempotency_key: format!("{}:{}", routing_key.as_str(), teacher.id),
    })
}

/// List all teachers, newest first.
pub struct ListTeachersUseCase<T: TeacherRepository> {
    pub teachers: T,
}

impl<T: TeacherRepository> ListTeachersUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Teacher>, TeacherServiceError> {
        self.teachers.list().await
    }
}

pub struct GetTeacherUseCase<T: TeacherRepository> {
    pub teachers: T,
}

impl<T: TeacherRepository> GetTeacherUseCase<T> {
    pub async fn execute(&self, id: Uuid) -> Result<Teacher, TeacherServiceError> {
        self.teachers
            .find_by_id(id)
            .await?
            .ok_or(TeacherServiceError::TeacherNotFound)
    }
}
