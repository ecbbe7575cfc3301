//! Session tokens for authenticated users.
//!
//! Sessions are stateless: a signed JWT (HS256) carrying the user's id and
//! username, delivered to the client in an HTTP-only cookie. Nothing is
//! stored server-side, so logout only clears the client's cookie.

use axum::http::{header, HeaderMap, StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

// ---

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

// ---

/// Claims encoded in the session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    //
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Identity resolved from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    //
    pub user_id: Uuid,
    pub username: String,
}

// ---

/// Issues a signed session token that expires after `ttl`.
///
/// # Returns
/// The encoded token on success, or HTTP 500 if signing fails or `ttl`
/// does not fit in a timestamp.
pub fn create_session(
    secret: &str,
    ttl: Duration,
    user_id: Uuid,
    username: &str,
) -> Result<String, StatusCode> {
    //
    let iat = chrono::Utc::now().timestamp();
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| iat.checked_add(secs))
        .ok_or_else(|| {
            //
            tracing::error!("Session lifetime of {}s overflows the expiry claim", ttl.as_secs());
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat,
        exp,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        //
        tracing::error!("Failed to sign session token: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!("Created session for user: {}", username);

    Ok(token)
}

/// Verifies a session token's signature and expiry.
///
/// Expiry is exact: no clock-skew leeway is granted past `exp`.
///
/// # Returns
/// The session identity, or HTTP 401 if the token is invalid or expired.
pub fn validate_session(secret: &str, token: &str) -> Result<SessionInfo, StatusCode> {
    //
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        //
        tracing::debug!("Rejected session token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
        //
        tracing::warn!("Session token carries a malformed subject");
        StatusCode::UNAUTHORIZED
    })?;

    Ok(SessionInfo {
        user_id,
        username: data.claims.username,
    })
}

/// Finds the session token in a request.
///
/// The `token` cookie is preferred; an `Authorization: Bearer` header is
/// accepted as a fallback for non-browser clients.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    //
    let jar = CookieJar::from_headers(headers);
    let from_cookie = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Cookie delivering a session token to the browser.
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    //
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie that, once added to a jar, tells the browser to drop the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    //
    let mut cookie = Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build();
    cookie.make_removal();
    cookie
}
