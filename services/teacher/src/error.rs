use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Teacher service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum TeacherServiceError {
    #[error("email already in use")]
    DuplicateEmail,
    #[error("teacher not found")]
    TeacherNotFound,
    #[error("invalid token")]
    InvalidToken,
    #[error("admin role required")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl TeacherServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::TeacherNotFound => "TEACHER_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for TeacherServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::TeacherNotFound => StatusCode::NOT_FOUND,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
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
