#![allow(async_fn_in_trait)]

use uuid::Uuid;

use campus_domain::user::UserRole;

use crate::domain::types::{OutboxEvent, RefreshTokenRecord, User, VerificationTokenRecord};
use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    /// Lookup by the provisioning key. `(role, external_id)` is unique, which
    /// is what makes redelivered `{role}.created` events no-ops.
    async fn find_by_external_id(
        &self,
        role: UserRole,
        external_id: &str,
    ) -> Result<Option<User>, AuthServiceError>;

    /// Insert a user, its first verification token and the matching
    /// email-verification outbox event atomically (same transaction).
    async fn create_with_verification_and_outbox(
        &self,
        user: &User,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError>;

    /// Flip `is_activated` and consume the verification token in one
    /// transaction. A crash between the two cannot leave a half-verified
    /// account.
    async fn activate_and_consume_token(
        &self,
        user_id: Uuid,
        token_id: Uuid,
    ) -> Result<(), AuthServiceError>;
}

/// Repository for persisted refresh tokens.
pub trait RefreshTokenRepository: Send + Sync {
    /// Delete any existing rows for the user and insert the new one in a
    /// single transaction: at most one active refresh token per user.
    async fn replace_for_user(&self, record: &RefreshTokenRecord) -> Result<(), AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, AuthServiceError>;

    /// Hard delete (logout). Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Repository for email verification tokens.
pub trait VerificationTokenRepository: Send + Sync {
    /// Insert a new token and its outbox event atomically (re-send flow).
    async fn create_with_outbox(
        &self,
        token: &VerificationTokenRecord,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError>;

    /// Find an unconsumed token row by token string.
    async fn find_unused_by_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationTokenRecord>, AuthServiceError>;
}
