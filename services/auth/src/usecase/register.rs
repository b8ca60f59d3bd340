use chrono::Utc;
use uuid::Uuid;

use campus_domain::user::UserRole;
use campus_events::{EmailVerification, Event};

use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::types::{OutboxEvent, User, VerificationTokenRecord};
use crate::error::AuthServiceError;
use crate::state::TokenSecrets;
use crate::usecase::credential::hash_password;
use crate::usecase::token::{Session, issue_session, issue_verification_token};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub session: Session,
}

/// Self-registration: create the (unactivated) account, its first
/// verification token and the email-verification outbox event in one
/// transaction, then issue the token pair.
pub struct RegisterUseCase<U: UserRepository, R: RefreshTokenRepository> {
    pub users: U,
    pub refresh_tokens: R,
    pub secrets: TokenSecrets,
}

impl<U: UserRepository, R: RefreshTokenRepository> RegisterUseCase<U, R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, AuthServiceError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthServiceError::DuplicateEmail);
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            password_hash: Some(password_hash),
            role: input.role,
            is_activated: false,
            external_id: None,
            created_at: now,
            updated_at: now,
        };

        let (token, event) = mint_verification(&user, &self.secrets.verification)?;
        self.users
            .create_with_verification_and_outbox(&user, &token, &event)
            .await?;

        let session = issue_session(&self.refresh_tokens, &user, &self.secrets).await?;
        Ok(RegisterOutput {
            user_id: user.id,
            session,
        })
    }
}

/// Build a verification token row and its outbox event for a user. Shared by
/// registration, provisioning and the re-send flow.
pub fn mint_verification(
    user: &User,
    verification_secret: &str,
) -> Result<(VerificationTokenRecord, OutboxEvent), AuthServiceError> {
    let (token, expires_at) = issue_verification_token(user.id, verification_secret)?;
    let record = VerificationTokenRecord {
        id: Uuid::new_v4(),
        user_id: user.id,
        token,
        expires_at,
        used: false,
        created_at: Utc::now(),
    };

    let event = Event::EmailVerification(EmailVerification {
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        verification_token: record.token.clone(),
    });
    let (routing_key, payload) = event
        .encode()
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
    let event = OutboxEvent {
        id: Uuid::new_v4(),
        kind: routing_key.as_str().to_owned(),
        payload,
        idempotency_key: format!("{}:{}", routing_key.as_str(), record.id),
    };

    Ok((record, event))
}
