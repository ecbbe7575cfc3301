//! User account handlers.
//!
//! 1. `register` - Create an account with a bcrypt-hashed password
//! 2. `login` - Verify credentials and issue a session token cookie
//! 3. `logout` - Clear the session token cookie

use crate::app_state::AppState;
use crate::domain::{validate_credentials, User};
use crate::handlers::shared_types::{ApiError, ErrorResponse};
use crate::infrastructure::password;
use crate::session;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Username and plaintext password, as submitted by the client.
#[derive(Deserialize, ToSchema)]
pub struct CredentialsRequest {
    // ---
    #[serde(default)]
    #[schema(example = "habit_tracker")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    // ---
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        // ---
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Session token issued on login. Also delivered in the `token` cookie.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    // ---
    pub token: String,
}

// ============================================================================
// Register Handler
// ============================================================================

/// POST /api/v1/users/register
///
/// Creates a user account. The password is hashed with bcrypt before it is
/// stored; the response carries only the public fields.
///
/// # Errors
///
/// Returns 400 if the username is shorter than 8 characters or already
/// taken, if the password is empty, or if the body is malformed.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid or duplicate username", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // ---
    let Json(req) = body?;

    validate_credentials(&req.username, &req.password).map_err(|msg| {
        // ---
        tracing::warn!("Rejected registration for '{}': {}", req.username, msg);
        ApiError::BadRequest(msg)
    })?;

    let password_hash = password::hash_password(req.password, state.bcrypt_cost())
        .await
        .map_err(|e| {
            // ---
            tracing::error!("Failed to hash password: {:?}", e);
            ApiError::Internal
        })?;

    let user = state
        .repository()
        .create_user(&req.username, &password_hash)
        .await
        .map_err(|e| {
            // ---
            tracing::warn!("Failed to create user '{}': {}", req.username, e);
            ApiError::BadRequest(e.to_string())
        })?;

    state.metrics().record_user_registered();
    tracing::info!("Registered user: {} ({})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ============================================================================
// Login Handler
// ============================================================================

/// POST /api/v1/users/login
///
/// Verifies the credentials and issues a session token that expires after
/// the configured lifetime (1 hour by default). The token is returned in the
/// body and set as an `HttpOnly; Secure; SameSite=None` cookie.
///
/// # Security
/// - Unknown usernames and wrong passwords produce the same 401 response
/// - Passwords are never logged
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse,
            headers(("set-cookie" = String, description = "Session token cookie"))),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    let Json(req) = body.map_err(|e| {
        // ---
        tracing::debug!("Malformed login body: {}", e.body_text());
        ApiError::Unauthorized
    })?;

    let user = state
        .repository()
        .get_user_by_username(&req.username)
        .await
        .map_err(|e| {
            // ---
            tracing::error!("Database error fetching user '{}': {:?}", req.username, e);
            ApiError::Internal
        })?;

    let Some(user) = user else {
        // ---
        // Unknown users cost one bcrypt check too, so timing does not reveal
        // which usernames exist.
        let dummy_hash = state.dummy_password_hash().await.map_err(|e| {
            // ---
            tracing::error!("Failed to prepare dummy password hash: {:?}", e);
            ApiError::Internal
        })?;
        let _ = password::verify_password(req.password, dummy_hash.to_string()).await;

        tracing::warn!("Login attempt for non-existent user: {}", req.username);
        state.metrics().record_login_failed();
        return Err(ApiError::Unauthorized);
    };

    let valid = password::verify_password(req.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            // ---
            tracing::error!("Password verification error for '{}': {:?}", user.username, e);
            ApiError::Internal
        })?;

    if !valid {
        // ---
        tracing::warn!("Invalid password for user: {}", user.username);
        state.metrics().record_login_failed();
        return Err(ApiError::Unauthorized);
    }

    let ttl = state.token_ttl();
    let token = session::create_session(state.jwt_secret(), ttl, user.id, &user.username)
        .map_err(|_| ApiError::Internal)?;

    let jar = jar.add(session::session_cookie(token.clone(), ttl));

    Ok((StatusCode::OK, jar, Json(LoginResponse { token })))
}

// ============================================================================
// Logout Handler
// ============================================================================

/// POST /api/v1/users/logout
///
/// Expires the session cookie. Tokens are stateless, so a copy kept by the
/// client remains valid until it expires.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    tag = "users",
    responses(
        (status = 204, description = "Session cookie cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    // ---
    (StatusCode::NO_CONTENT, jar.add(session::expired_session_cookie()))
}
