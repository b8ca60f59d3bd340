use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::handlers::authenticated;
use crate::state::AppState;
use crate::usecase::verify::{
    ConfirmVerificationUseCase, SendVerificationOutcome, SendVerificationUseCase,
};

pub async fn send_verification(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let info = authenticated(&jar, &state.secrets.access)?;

    let usecase = SendVerificationUseCase {
        users: state.user_repo(),
        verification_tokens: state.verification_token_repo(),
        verification_secret: state.secrets.verification.clone(),
    };
    let outcome = usecase.execute(info.user_id).await?;

    let status = match outcome {
        SendVerificationOutcome::Sent => "sent",
        SendVerificationOutcome::AlreadyVerified => "already_verified",
    };
    Ok(Json(serde_json::json!({ "success": true, "status": status })))
}

#[derive(Deserialize)]
pub struct ConfirmQuery {
    pub token: String,
}

pub async fn confirm_verification(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ConfirmVerificationUseCase {
        users: state.user_repo(),
        verification_tokens: state.verification_token_repo(),
        verification_secret: state.secrets.verification.clone(),
    };
    let user_id = usecase.execute(&query.token).await?;

    Ok(Json(serde_json::json!({ "success": true, "userId": user_id })))
}
