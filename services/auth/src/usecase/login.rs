use uuid::Uuid;

use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthServiceError;
use crate::state::TokenSecrets;
use crate::usecase::credential::verify_password;
use crate::usecase::token::{Session, issue_session};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub session: Session,
}

/// Password login. Unknown email, missing password hash (shadow user) and
/// wrong password are indistinguishable to the caller; an unverified account
/// is a distinct 403 with no tokens issued.
pub struct LoginUseCase<U: UserRepository, R: RefreshTokenRepository> {
    pub users: U,
    pub refresh_tokens: R,
    pub secrets: TokenSecrets,
}

impl<U: UserRepository, R: RefreshTokenRepository> LoginUseCase<U, R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::InvalidCredentials)?;
        if !verify_password(&input.password, hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !user.is_activated {
            return Err(AuthServiceError::NotActivated);
        }

        let session = issue_session(&self.refresh_tokens, &user, &self.secrets).await?;
        Ok(LoginOutput {
            user_id: user.id,
            session,
        })
    }
}
