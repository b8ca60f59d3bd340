use sea_orm::DatabaseConnection;

use crate::config::TeacherConfig;
use crate::infra::db::DbTeacherRepository;
use crate::outbox::DbOutboxStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub access_token_secret: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &TeacherConfig) -> Self {
        Self {
            db,
            access_token_secret: config.access_token_secret.clone(),
        }
    }

    pub fn teacher_repo(&self) -> DbTeacherRepository {
        DbTeacherRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_store(&self) -> DbOutboxStore {
        DbOutboxStore {
            db: self.db.clone(),
        }
    }
}
