use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use uuid::Uuid;

use campus_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use campus_auth_types::token::{AuthError, JwtClaims, validate_token};

use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::types::{
    REFRESH_TOKEN_TTL_DAYS, RefreshTokenRecord, User, VERIFICATION_TOKEN_TTL_SECS,
};
use crate::error::AuthServiceError;
use crate::state::TokenSecrets;

/// Why a presented token was rejected. Callers collapse every variant to the
/// same 401/400 response; the discrimination exists for logging.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("no matching persisted token")]
    NotFound,
    #[error("token revoked")]
    Revoked,
}

impl From<AuthError> for TokenError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidSignature => Self::InvalidSignature,
            AuthError::Expired => Self::Expired,
            AuthError::Malformed => Self::Malformed,
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn rejected_refresh(reason: &TokenError) -> AuthServiceError {
    warn!(reason = %reason, "refresh token rejected");
    AuthServiceError::InvalidRefreshToken
}

// ── Issuing ──────────────────────────────────────────────────────────────────

/// Stateless access token: `{sub, email, role, iat, exp}`, 1-hour lifetime.
pub fn issue_access_token(user: &User, secret: &str) -> Result<(String, u64), AuthServiceError> {
    let iat = now_secs();
    let exp = iat + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_u8(),
        iat,
        exp,
        jti: None,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Refresh token carrying the persisted row id as `jti`. The JWT `exp`
/// mirrors the row's `expires_at`; the row is the authoritative check.
pub fn issue_refresh_token(user: &User, jti: Uuid, secret: &str) -> Result<String, AuthServiceError> {
    let iat = now_secs();
    let exp = iat + REFRESH_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_u8(),
        iat,
        exp,
        jti: Some(jti.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Token pair issued on register/login.
#[derive(Debug)]
pub struct Session {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Persist a fresh refresh-token row (delete-then-insert, one per user) and
/// issue the JWT pair for it.
pub async fn issue_session<R: RefreshTokenRepository>(
    refresh_tokens: &R,
    user: &User,
    secrets: &TokenSecrets,
) -> Result<Session, AuthServiceError> {
    let now = Utc::now();
    let record = RefreshTokenRecord {
        id: Uuid::new_v4(),
        user_id: user.id,
        expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
        revoked: false,
        created_at: now,
    };
    refresh_tokens.replace_for_user(&record).await?;

    let refresh_token = issue_refresh_token(user, record.id, &secrets.refresh)?;
    let (access_token, access_token_exp) = issue_access_token(user, &secrets.access)?;
    Ok(Session {
        access_token,
        access_token_exp,
        refresh_token,
    })
}

// ── Verification tokens ──────────────────────────────────────────────────────

/// Claims of the short-lived email verification JWT. `jti` is random so
/// re-sends within the same second still mint distinct token strings (the
/// persisted token column is unique).
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub sub: String,
    pub jti: String,
    pub iat: u64,
    pub exp: u64,
}

/// Mint a verification JWT; the returned `expires_at` is persisted on the
/// matching single-use row.
pub fn issue_verification_token(
    user_id: Uuid,
    secret: &str,
) -> Result<(String, DateTime<Utc>), AuthServiceError> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::seconds(VERIFICATION_TOKEN_TTL_SECS);
    let claims = VerificationClaims {
        sub: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: issued_at.timestamp() as u64,
        exp: expires_at.timestamp() as u64,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, expires_at))
}

pub fn validate_verification_token(
    token: &str,
    secret: &str,
) -> Result<VerificationClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<VerificationClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── RefreshAccessToken ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshAccessTokenOutput {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
}

/// Exchange a valid refresh token for a new access token. The signature, the
/// JWT `exp` and the persisted row (present, unrevoked, unexpired) must all
/// hold; the refresh token itself is not rotated.
pub struct RefreshAccessTokenUseCase<U: UserRepository, R: RefreshTokenRepository> {
    pub users: U,
    pub refresh_tokens: R,
    pub secrets: TokenSecrets,
}

impl<U: UserRepository, R: RefreshTokenRepository> RefreshAccessTokenUseCase<U, R> {
    pub async fn execute(
        &self,
        refresh_value: &str,
    ) -> Result<RefreshAccessTokenOutput, AuthServiceError> {
        let claims = validate_token(refresh_value, &self.secrets.refresh)
            .map_err(|e| rejected_refresh(&TokenError::from(e)))?;

        let jti = parse_jti(&claims).ok_or_else(|| rejected_refresh(&TokenError::Malformed))?;

        let record = self
            .refresh_tokens
            .find_by_id(jti)
            .await?
            .ok_or_else(|| rejected_refresh(&TokenError::NotFound))?;
        if record.revoked {
            return Err(rejected_refresh(&TokenError::Revoked));
        }
        if record.expires_at <= Utc::now() {
            return Err(rejected_refresh(&TokenError::Expired));
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| rejected_refresh(&TokenError::NotFound))?;

        let (access_token, access_token_exp) = issue_access_token(&user, &self.secrets.access)?;
        Ok(RefreshAccessTokenOutput {
            user_id: user.id,
            access_token,
            access_token_exp,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

/// Delete the persisted refresh-token row named by the presented token.
pub struct LogoutUseCase<R: RefreshTokenRepository> {
    pub refresh_tokens: R,
    pub refresh_secret: String,
}

impl<R: RefreshTokenRepository> LogoutUseCase<R> {
    pub async fn execute(&self, refresh_value: &str) -> Result<(), AuthServiceError> {
        let claims = validate_token(refresh_value, &self.refresh_secret)
            .map_err(|e| rejected_refresh(&TokenError::from(e)))?;

        let jti = parse_jti(&claims).ok_or_else(|| rejected_refresh(&TokenError::Malformed))?;

        let removed = self.refresh_tokens.delete(jti).await?;
        if !removed {
            debug!(jti = %jti, "refresh token already absent at logout");
        }
        Ok(())
    }
}

fn parse_jti(claims: &JwtClaims) -> Option<Uuid> {
    claims.jti.as_deref().and_then(|v| v.parse::<Uuid>().ok())
}
