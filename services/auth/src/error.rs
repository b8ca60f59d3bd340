use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("email already in use")]
    DuplicateEmail,
    #[error("invalid role")]
    InvalidRole,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account not verified")]
    NotActivated,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("invalid or expired verification token")]
    InvalidVerificationToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotActivated => "NOT_ACTIVATED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateEmail | Self::InvalidRole | Self::InvalidVerificationToken => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::InvalidToken | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotActivated => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
