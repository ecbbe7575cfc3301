use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body returned for every client-visible error.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    // ---
    #[schema(example = "Not Found")]
    pub err: String,
}

/// Errors surfaced by the HTTP handlers.
///
/// Each variant maps to one status code and an `{ "err": "..." }` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ---
    /// Missing or mismatched fields, malformed JSON, or a rejected write.
    #[error("{0}")]
    BadRequest(String),

    #[error("Not Found")]
    NotFound,

    /// Missing, invalid, or expired session token, or bad credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Infrastructure failure. Details are logged, never returned.
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    // ---
    /// Generic validation failure.
    pub fn bad_request() -> Self {
        ApiError::BadRequest("Bad Request".to_string())
    }

    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let body = ErrorResponse {
            err: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // ---
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        // ---
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_body() {
        // ---
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({ "err": "Not Found" }));
    }

    #[tokio::test]
    async fn unauthorized_body() {
        // ---
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["err"], "Unauthorized");
    }

    #[tokio::test]
    async fn bad_request_passes_message_through() {
        // ---
        let response = ApiError::BadRequest("username 'x' is already taken".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["err"], "username 'x' is already taken");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        // ---
        let response = ApiError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["err"], "Internal Server Error");
    }
}
