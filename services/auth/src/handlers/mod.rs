pub mod auth;
pub mod verify;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

use campus_auth_types::cookie::{CAMPUS_ACCESS_TOKEN, CAMPUS_REFRESH_TOKEN};
use campus_auth_types::token::{TokenInfo, validate_access_token};

use crate::error::AuthServiceError;

/// Header carrying the access token's expiry (seconds since epoch) so
/// clients can schedule a refresh without decoding the JWT.
pub const ACCESS_TOKEN_EXP_HEADER: &str = "x-campus-access-token-expires";

/// Validate the access-token cookie and return the caller's identity.
pub fn authenticated(jar: &CookieJar, access_secret: &str) -> Result<TokenInfo, AuthServiceError> {
    let cookie = jar
        .get(CAMPUS_ACCESS_TOKEN)
        .ok_or(AuthServiceError::InvalidToken)?;
    validate_access_token(cookie.value(), access_secret)
        .map_err(|_| AuthServiceError::InvalidToken)
}

/// Pull the refresh token from the cookie, falling back to a bearer header
/// for non-browser clients.
pub fn refresh_token_value(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(CAMPUS_REFRESH_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}
