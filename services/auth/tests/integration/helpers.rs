//! In-memory repositories backing the usecase tests.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use campus_auth::domain::repository::{
    RefreshTokenRepository, UserRepository, VerificationTokenRepository,
};
use campus_auth::domain::types::{OutboxEvent, RefreshTokenRecord, User, VerificationTokenRecord};
use campus_auth::error::AuthServiceError;
use campus_auth::state::TokenSecrets;
use campus_auth::usecase::credential::hash_password;
use campus_domain::user::UserRole;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";
pub const TEST_VERIFICATION_SECRET: &str = "test-verification-secret";

pub fn test_secrets() -> TokenSecrets {
    TokenSecrets {
        access: TEST_ACCESS_SECRET.to_owned(),
        refresh: TEST_REFRESH_SECRET.to_owned(),
        verification: TEST_VERIFICATION_SECRET.to_owned(),
    }
}

/// All auth tables behind one cloneable handle, so the user repo's
/// transactional inserts land in the same stores the other repos read.
#[derive(Clone, Default)]
pub struct MockDb {
    pub users: Arc<Mutex<Vec<User>>>,
    pub refresh_tokens: Arc<Mutex<Vec<RefreshTokenRecord>>>,
    pub verification_tokens: Arc<Mutex<Vec<VerificationTokenRecord>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockDb {
    pub fn with_user(user: User) -> Self {
        let db = Self::default();
        db.users.lock().unwrap().push(user);
        db
    }

    pub fn outbox_kinds(&self) -> Vec<String> {
        self.outbox
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.clone())
            .collect()
    }
}

impl UserRepository for MockDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_external_id(
        &self,
        role: UserRole,
        external_id: &str,
    ) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.role == role && u.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn create_with_verification_and_outbox(
        &self,
        user: &User,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.users.lock().unwrap().push(user.clone());
        self.verification_tokens.lock().unwrap().push(token.clone());
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn activate_and_consume_token(
        &self,
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<(), AuthServiceError> {
        for user in self.users.lock().unwrap().iter_mut() {
            if user.id == user_id {
                user.is_activated = true;
                user.updated_at = Utc::now();
            }
        }
        for token in self.verification_tokens.lock().unwrap().iter_mut() {
            if token.id == token_id {
                token.used = true;
            }
        }
        Ok(())
    }
}

impl RefreshTokenRepository for MockDb {
    async fn replace_for_user(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError> {
        let mut rows = self.refresh_tokens.lock().unwrap();
        rows.retain(|r| r.user_id != record.user_id);
        rows.push(record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, AuthServiceError> {
        Ok(self
            .refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut rows = self.refresh_tokens.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}

impl VerificationTokenRepository for MockDb {
    async fn create_with_outbox(
        &self,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.verification_tokens.lock().unwrap().push(token.clone());
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_unused_by_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationTokenRecord>, AuthServiceError> {
        Ok(self
            .verification_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token && !t.used)
            .cloned())
    }
}

/// An activated user with a real Argon2 hash for `password`.
pub fn activated_user(email: &str, password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: "Test User".to_owned(),
        email: email.to_owned(),
        password_hash: Some(hash_password(password).unwrap()),
        role: UserRole::Student,
        is_activated: true,
        external_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn unactivated_user(email: &str, password: &str) -> User {
    User {
        is_activated: false,
        ..activated_user(email, password)
    }
}

pub fn refresh_row(user_id: Uuid) -> RefreshTokenRecord {
    RefreshTokenRecord {
        id: Uuid::new_v4(),
        user_id,
        expires_at: Utc::now() + Duration::days(365),
        revoked: false,
        created_at: Utc::now(),
    }
}
