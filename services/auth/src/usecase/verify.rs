use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::error::AuthServiceError;
use crate::usecase::register::mint_verification;
use crate::usecase::token::{TokenError, validate_verification_token};

#[derive(Debug, PartialEq, Eq)]
pub enum SendVerificationOutcome {
    Sent,
    AlreadyVerified,
}

/// Mint and enqueue a fresh verification token for a not-yet-activated user.
/// Earlier unexpired tokens stay valid; each row is independently single-use.
pub struct SendVerificationUseCase<U: UserRepository, V: VerificationTokenRepository> {
    pub users: U,
    pub verification_tokens: V,
    pub verification_secret: String,
}

impl<U: UserRepository, V: VerificationTokenRepository> SendVerificationUseCase<U, V> {
    pub async fn execute(&self, user_id: Uuid) -> Result<SendVerificationOutcome, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if user.is_activated {
            return Ok(SendVerificationOutcome::AlreadyVerified);
        }

        let (token, event) = mint_verification(&user, &self.verification_secret)?;
        self.verification_tokens
            .create_with_outbox(&token, &event)
            .await?;
        Ok(SendVerificationOutcome::Sent)
    }
}

/// Confirm a verification token: signature, unconsumed row, strict expiry,
/// then activate the user and consume the row in one transaction. A second
/// confirmation with the same token fails even though the signature still
/// verifies.
pub struct ConfirmVerificationUseCase<U: UserRepository, V: VerificationTokenRepository> {
    pub users: U,
    pub verification_tokens: V,
    pub verification_secret: String,
}

impl<U: UserRepository, V: VerificationTokenRepository> ConfirmVerificationUseCase<U, V> {
    pub async fn execute(&self, token_value: &str) -> Result<Uuid, AuthServiceError> {
        let claims = validate_verification_token(token_value, &self.verification_secret)
            .map_err(|e| rejected(&e))?;

        let record = self
            .verification_tokens
            .find_unused_by_token(token_value)
            .await?
            .ok_or_else(|| rejected(&TokenError::NotFound))?;

        // Strictly greater-than: a token presented exactly at expires_at is expired.
        if record.expires_at <= Utc::now() {
            return Err(rejected(&TokenError::Expired));
        }
        if record.user_id.to_string() != claims.sub {
            return Err(rejected(&TokenError::Malformed));
        }

        self.users
            .activate_and_consume_token(record.user_id, record.id)
            .await?;
        Ok(record.user_id)
    }
}

fn rejected(reason: &TokenError) -> AuthServiceError {
    warn!(reason = %reason, "verification token rejected");
    AuthServiceError::InvalidVerificationToken
}
