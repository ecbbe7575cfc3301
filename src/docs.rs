//! OpenAPI documentation.
//!
//! [`ApiDoc`] generates the OpenAPI document for the habit and user
//! endpoints. It is served as JSON at `/openapi.json` and rendered by
//! Swagger UI at `/api-docs`.

use crate::domain::Habit;
use crate::handlers::habits::HabitRequest;
use crate::handlers::shared_types::ErrorResponse;
use crate::handlers::users::{CredentialsRequest, LoginResponse, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// Path of the Swagger UI.
pub const SWAGGER_UI_PATH: &str = "/api-docs";

/// Registers the two ways a session token can be presented.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // ---
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                crate::session::SESSION_COOKIE,
                "HTTP-only session cookie set by POST /api/v1/users/login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Habits API",
        description = "Track named, categorized habits. Writes require a session from /api/v1/users/login.",
        license(name = "MIT")
    ),
    paths(
        crate::handlers::habits::list_habits,
        crate::handlers::habits::get_habit,
        crate::handlers::habits::create_habit,
        crate::handlers::habits::update_habit,
        crate::handlers::habits::delete_habit,
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::users::logout,
    ),
    components(schemas(
        Habit,
        HabitRequest,
        CredentialsRequest,
        UserResponse,
        LoginResponse,
        ErrorResponse
    )),
    tags(
        (name = "habits", description = "Habit CRUD"),
        (name = "users", description = "Registration and sessions")
    )
)]
pub struct ApiDoc;
