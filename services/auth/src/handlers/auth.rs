use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_auth_types::cookie::{
    clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
};
use campus_core::serde::to_rfc3339_ms;
use campus_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;
use crate::handlers::{ACCESS_TOKEN_EXP_HEADER, authenticated, refresh_token_value};
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::register::{RegisterInput, RegisterUseCase};
use crate::usecase::token::{LogoutUseCase, RefreshAccessTokenUseCase, Session};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: u8,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let role = UserRole::from_u8(payload.role).ok_or(AuthServiceError::InvalidRole)?;

    let usecase = RegisterUseCase {
        users: state.user_repo(),
        refresh_tokens: state.refresh_token_repo(),
        secrets: state.secrets.clone(),
    };
    let output = usecase
        .execute(RegisterInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role,
        })
        .await?;

    let (jar, headers) = session_response(jar, &state.cookie_domain, &output.session);
    Ok((
        StatusCode::CREATED,
        headers,
        jar,
        Json(serde_json::json!({ "success": true, "userId": output.user_id })),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        refresh_tokens: state.refresh_token_repo(),
        secrets: state.secrets.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let (jar, headers) = session_response(jar, &state.cookie_domain, &output.session);
    Ok((
        headers,
        jar,
        Json(serde_json::json!({ "success": true, "userId": output.user_id })),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_value =
        refresh_token_value(&jar, &headers).ok_or(AuthServiceError::InvalidRefreshToken)?;

    let usecase = RefreshAccessTokenUseCase {
        users: state.user_repo(),
        refresh_tokens: state.refresh_token_repo(),
        secrets: state.secrets.clone(),
    };
    let output = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(jar, output.access_token, state.cookie_domain.clone());
    let mut response_headers = HeaderMap::new();
    if let Ok(value) = output.access_token_exp.to_string().parse() {
        response_headers.insert(ACCESS_TOKEN_EXP_HEADER, value);
    }
    Ok((
        response_headers,
        jar,
        Json(serde_json::json!({ "success": true, "userId": output.user_id })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthServiceError> {
    if let Some(refresh_value) = refresh_token_value(&jar, &headers) {
        let usecase = LogoutUseCase {
            refresh_tokens: state.refresh_token_repo(),
            refresh_secret: state.secrets.refresh.clone(),
        };
        // A garbage refresh token still clears cookies; the session server-side
        // state is gone either way.
        let _ = usecase.execute(&refresh_value).await;
    }

    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((jar, Json(serde_json::json!({ "success": true }))))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: u8,
    pub is_activated: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let info = authenticated(&jar, &state.secrets.access)?;

    let user = state
        .user_repo()
        .find_by_id(info.user_id)
        .await?
        .ok_or(AuthServiceError::UserNotFound)?;

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_u8(),
        is_activated: user.is_activated,
        created_at: user.created_at,
    }))
}

fn session_response(jar: CookieJar, domain: &str, session: &Session) -> (CookieJar, HeaderMap) {
    let jar = set_access_token_cookie(jar, session.access_token.clone(), domain.to_owned());
    let jar = set_refresh_token_cookie(jar, session.refresh_token.clone(), domain.to_owned());
    let mut headers = HeaderMap::new();
    if let Ok(value) = session.access_token_exp.to_string().parse() {
        headers.insert(ACCESS_TOKEN_EXP_HEADER, value);
    }
    (jar, headers)
}
