use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::user::UserRole;

/// Account record owned by the auth service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// `None` for shadow users provisioned from `{role}.created` events;
    /// they cannot log in until a password is set.
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub is_activated: bool,
    /// Id of the source entity in the producing service, set on shadow users.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted refresh token; the row id doubles as the JWT `jti` claim.
/// Liveness (unrevoked, unexpired) is checked where the token is exchanged,
/// so each rejection reason keeps its own log line.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

/// Single-use email verification token row.
#[derive(Debug, Clone)]
pub struct VerificationTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

/// Outbox event written in the same transaction as the rows it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Verification token time-to-live in seconds (1 hour).
pub const VERIFICATION_TOKEN_TTL_SECS: i64 = 3600;

/// Refresh-token row lifetime in days (1 year).
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 365;
