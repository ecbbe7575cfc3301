use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Habits API 👋
Version: {version}

Available endpoints:
  - GET    /api/v1/habits               - List habits (?category= or ?keyword=)
  - GET    /api/v1/habits/{{id}}          - Fetch a habit by ID
  - POST   /api/v1/habits               - Add a habit (login required)
  - PUT    /api/v1/habits/{{id}}          - Update a habit (login required)
  - DELETE /api/v1/habits/{{id}}          - Delete a habit (login required)
  - POST   /api/v1/users/register       - Create an account
  - POST   /api/v1/users/login          - Log in, sets the session cookie
  - POST   /api/v1/users/logout         - Clear the session cookie
  - GET    /api-docs                    - Interactive API documentation
  - GET    /health                      - Light health check
  - GET    /health?mode=full            - Full health check (includes storage)
"#
    )
}
