//! Cookie builders for access and refresh tokens.
//!
//! The access cookie outlives its JWT on purpose: the JWT `exp` (1 hour) is
//! authoritative for session validity, while the 1-day cookie keeps the value
//! around so expired sessions get a clean 401 into the refresh flow.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const CAMPUS_ACCESS_TOKEN: &str = "campus_access_token";

/// Cookie name for the refresh token.
pub const CAMPUS_REFRESH_TOKEN: &str = "campus_refresh_token";

/// Access-token JWT lifetime in seconds (1 hour).
pub const ACCESS_TOKEN_EXP: u64 = 3600;

/// Access cookie Max-Age in seconds (1 day).
pub const ACCESS_COOKIE_MAX_AGE: u64 = 86400;

/// Refresh-token lifetime in seconds (1 year) — JWT `exp`, cookie Max-Age and
/// the persisted row's `expires_at` all use this value.
pub const REFRESH_TOKEN_EXP: u64 = 31_536_000;

/// Set the access-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use campus_auth_types::cookie::{set_access_token_cookie, CAMPUS_ACCESS_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "token_value".to_string(), "campus.test".to_string());
/// let cookie = jar.get(CAMPUS_ACCESS_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("campus.test"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((CAMPUS_ACCESS_TOKEN, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(ACCESS_COOKIE_MAX_AGE as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Set the refresh-token cookie on the jar.
///
/// Scoped to `/auth` and SameSite=Strict — only the refresh and logout
/// endpoints ever see it.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use axum_extra::extract::cookie::SameSite;
/// use campus_auth_types::cookie::{set_refresh_token_cookie, CAMPUS_REFRESH_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "refresh_value".to_string(), "campus.test".to_string());
/// let cookie = jar.get(CAMPUS_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/auth"));
/// assert_eq!(cookie.domain(), Some("campus.test"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(31_536_000)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Strict));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((CAMPUS_REFRESH_TOKEN, value))
        .path("/auth")
        .domain(domain)
        .max_age(Duration::seconds(REFRESH_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}

/// Clear both token cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use campus_auth_types::cookie::{
///     clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
///     CAMPUS_ACCESS_TOKEN, CAMPUS_REFRESH_TOKEN,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "a".to_string(), "campus.test".to_string());
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), "campus.test".to_string());
/// let jar = clear_cookies(jar, "campus.test".to_string());
/// let access = jar.get(CAMPUS_ACCESS_TOKEN).unwrap();
/// let refresh = jar.get(CAMPUS_REFRESH_TOKEN).unwrap();
/// assert_eq!(access.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(refresh.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_cookies(jar: CookieJar, domain: String) -> CookieJar {
    let access = Cookie::build((CAMPUS_ACCESS_TOKEN, ""))
        .path("/")
        .domain(domain.clone())
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    let refresh = Cookie::build((CAMPUS_REFRESH_TOKEN, ""))
        .path("/auth")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(access).add(refresh)
}
