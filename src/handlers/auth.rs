//! Session verification for protected routes.

use crate::app_state::AppState;
use crate::handlers::shared_types::ApiError;
use crate::session::{self, SessionInfo};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Extractor for the authenticated caller.
///
/// Adding `AuthUser` to a handler's arguments makes the route protected:
/// the session token is read from the `token` cookie (or a bearer header)
/// and verified before any later extractor or the handler body runs.
/// Absent or invalid tokens are rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionInfo);

impl FromRequestParts<AppState> for AuthUser {
    // ---
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // ---
        let token = session::token_from_headers(&parts.headers).ok_or_else(|| {
            // ---
            tracing::debug!("Missing session token for {} {}", parts.method, parts.uri.path());
            ApiError::Unauthorized
        })?;

        let info = session::validate_session(state.jwt_secret(), &token).map_err(|_| {
            // ---
            tracing::warn!("Invalid session token for {} {}", parts.method, parts.uri.path());
            ApiError::Unauthorized
        })?;

        Ok(AuthUser(info))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::config::AuthConfig;
    use crate::infrastructure::{create_memory_repository, create_noop_metrics};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "extractor-secret";

    async fn whoami(AuthUser(info): AuthUser) -> String {
        info.username
    }

    fn app() -> Router {
        // ---
        let auth = AuthConfig {
            jwt_secret: SECRET.to_string(),
            token_ttl: Duration::from_secs(60),
            bcrypt_cost: 4,
        };
        let state = AppState::new(create_noop_metrics().unwrap(), create_memory_repository(), auth);

        Router::new().route("/whoami", get(whoami)).with_state(state)
    }

    fn token() -> String {
        session::create_session(SECRET, Duration::from_secs(60), Uuid::new_v4(), "habit_owner").unwrap()
    }

    async fn call(request: Request<Body>) -> (StatusCode, String) {
        // ---
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn accepts_session_cookie() {
        // ---
        let request = Request::builder()
            .uri("/whoami")
            .header(header::COOKIE, format!("theme=dark; token={}", token()))
            .body(Body::empty())
            .unwrap();

        assert_eq!(call(request).await, (StatusCode::OK, "habit_owner".to_string()));
    }

    #[tokio::test]
    async fn accepts_bearer_token() {
        // ---
        let request = Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token()))
            .body(Body::empty())
            .unwrap();

        assert_eq!(call(request).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_or_forged_token() {
        // ---
        let forged = session::create_session("other-secret", Duration::from_secs(60), Uuid::new_v4(), "mallory_x")
            .unwrap();

        for cookie in [None, Some(format!("token={forged}")), Some("token=garbage".to_string())] {
            let mut builder = Request::builder().uri("/whoami");
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }

            let (status, body) = call(builder.body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, r#"{"err":"Unauthorized"}"#);
        }
    }
}
