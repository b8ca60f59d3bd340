use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use campus_teacher_schema::{outbox_events, teachers};

use crate::domain::repository::TeacherRepository;
use crate::domain::types::{OutboxEvent, Teacher};
use crate::error::TeacherServiceError;

#[derive(Clone)]
pub struct DbTeacherRepository {
    pub db: DatabaseConnection,
}

impl TeacherRepository for DbTeacherRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, TeacherServiceError> {
        let model = teachers::Entity::find()
            .filter(teachers::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find teacher by email")?;
        Ok(model.map(teacher_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, TeacherServiceError> {
        let model = teachers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find teacher by id")?;
        Ok(model.map(teacher_from_model))
    }

    async fn list(&self) -> Result<Vec<Teacher>, TeacherServiceError> {
        let models = teachers::Entity::find()
            .order_by_desc(teachers::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list teachers")?;
        Ok(models.into_iter().map(teacher_from_model).collect())
    }

    async fn create_with_outbox(
        &self,
        teacher: &Teacher,
        event: &OutboxEvent,
    ) -> Result<(), TeacherServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let teacher = teacher.clone();
                let event = event.clone();
                Box::pin(async move {
                    teachers::ActiveModel {
                        id: Set(teacher.id),
                        first_name: Set(teacher.first_name.clone()),
                        last_name: Set(teacher.last_name.clone()),
                        email: Set(teacher.email.clone()),
                        phone: Set(teacher.phone.clone()),
                        created_at: Set(teacher.created_at),
                        updated_at: Set(teacher.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    let now = Utc::now();
                    outbox_events::ActiveModel {
                        id: Set(event.id),
                        kind: Set(event.kind.clone()),
                        payload: Set(event.payload.clone()),
                        idempotency_key: Set(event.idempotency_key.clone()),
                        attempts: Set(0),
                        last_error: Set(None),
                        created_at: Set(now),
                        next_attempt_at: Set(now),
                        processed_at: Set(None),
                        failed_at: Set(None),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create teacher with outbox")?;
        Ok(())
    }
}

fn teacher_from_model(model: teachers::Model) -> Teacher {
    Teacher {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
