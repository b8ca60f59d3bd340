pub mod teacher;

use axum_extra::extract::cookie::CookieJar;

use campus_auth_types::cookie::CAMPUS_ACCESS_TOKEN;
use campus_auth_types::token::{TokenInfo, validate_access_token};
use campus_domain::user::UserRole;

use crate::error::TeacherServiceError;

/// Validate the access-token cookie and return the caller's identity.
pub fn authenticated(
    jar: &CookieJar,
    access_secret: &str,
) -> Result<TokenInfo, TeacherServiceError> {
    let cookie = jar
        .get(CAMPUS_ACCESS_TOKEN)
        .ok_or(TeacherServiceError::InvalidToken)?;
    validate_access_token(cookie.value(), access_secret)
        .map_err(|_| TeacherServiceError::InvalidToken)
}

/// Like [`authenticated`], but the caller must be an admin.
pub fn admin_only(jar: &CookieJar, access_secret: &str) -> Result<TokenInfo, TeacherServiceError> {
    let info = authenticated(jar, access_secret)?;
    if UserRole::from_u8(info.user_role) != Some(UserRole::Admin) {
        return Err(TeacherServiceError::Forbidden);
    }
    Ok(info)
}
