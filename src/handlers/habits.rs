use crate::app_state::AppState;
use crate::domain::{Habit, HabitFilter, NewHabit};
use crate::handlers::auth::AuthUser;
use crate::handlers::shared_types::{ApiError, ErrorResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters accepted by the list endpoint.
///
/// At most one filter applies; `keyword` wins when both are given.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HabitQuery {
    /// Exact category to match.
    category: Option<String>,
    /// Words that must all appear in the name, category, or description.
    keyword: Option<String>,
}

/// Request body for creating or updating a habit.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as `400 Bad Request` instead of an extractor rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HabitRequest {
    /// Required on update and must match the path; ignored on create.
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl HabitRequest {
    // ---
    /// Checks required fields and extracts the mutable ones.
    fn into_fields(self) -> Result<NewHabit, ApiError> {
        // ---
        let required = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(ApiError::bad_request)
        };

        Ok(NewHabit {
            name: required(self.name)?,
            category: required(self.category)?,
            description: self.description,
        })
    }
}

/// Parses a habit identifier. Malformed identifiers cannot match any record.
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    // ---
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound)
}

fn same_id(path_id: &str, body_id: &str) -> bool {
    // ---
    match (Uuid::parse_str(path_id), Uuid::parse_str(body_id)) {
        (Ok(a), Ok(b)) => a == b,
        _ => path_id == body_id,
    }
}

/// GET /api/v1/habits
///
/// Lists all habits, or those matching `category` or `keyword`.
#[utoipa::path(
    get,
    path = "/api/v1/habits",
    tag = "habits",
    params(HabitQuery),
    responses(
        (status = 200, description = "Matching habits", body = [Habit])
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitQuery>,
) -> Result<Json<Vec<Habit>>, ApiError> {
    // ---
    let filter = HabitFilter::from_query(query.category, query.keyword);

    let habits = state.repository().list_habits(&filter).await.map_err(|e| {
        tracing::error!("Failed to list habits with {:?}: {}", filter, e);
        ApiError::Internal
    })?;

    Ok(Json(habits))
}

/// GET /api/v1/habits/{id}
///
/// - `200 OK` with the habit if it exists.
/// - `404 Not Found` with `{ "err": "Not Found" }` otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit identifier")),
    responses(
        (status = 200, description = "The habit", body = Habit),
        (status = 404, description = "No such habit", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    // ---
    let id = parse_id(&id)?;

    let habit = state
        .repository()
        .get_habit(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch habit {}: {}", id, e);
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(habit))
}

/// POST /api/v1/habits
///
/// Requires a session. `name` and `category` are required; any `id` in the
/// body is ignored and a new one is generated.
///
/// - `201 Created` with an empty body and a `Location` header.
/// - `400 Bad Request` if a required field is missing or the write fails.
/// - `401 Unauthorized` without a valid session token.
#[utoipa::path(
    post,
    path = "/api/v1/habits",
    tag = "habits",
    request_body = HabitRequest,
    security(("SessionCookie" = []), ("BearerToken" = [])),
    responses(
        (status = 201, description = "Habit created",
            headers(("location" = String, description = "URL of the new habit"))),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, user, body), fields(username = %user.0.username, user_id = %user.0.user_id))]
pub async fn create_habit(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<HabitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    let Json(request) = body?;
    let fields = request.into_fields()?;

    let habit = state.repository().create_habit(fields).await.map_err(|e| {
        tracing::error!("Failed to create habit: {}", e);
        ApiError::BadRequest(e.to_string())
    })?;

    state.metrics().record_habit_created();
    tracing::info!("Created habit {} ({})", habit.id, habit.name);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/habits/{}", habit.id))],
    ))
}

/// PUT /api/v1/habits/{id}
///
/// Requires a session. The body's `id` must equal the path identifier and
/// `name` and `category` are required; all mutable fields are replaced.
///
/// - `204 No Content` on success.
/// - `400 Bad Request` on an id mismatch, a missing field, or a failed write.
/// - `404 Not Found` if the habit does not exist.
/// - `401 Unauthorized` without a valid session token.
#[utoipa::path(
    put,
    path = "/api/v1/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit identifier")),
    request_body = HabitRequest,
    security(("SessionCookie" = []), ("BearerToken" = [])),
    responses(
        (status = 204, description = "Habit updated"),
        (status = 400, description = "Identifier mismatch or missing field", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "No such habit", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, user, body), fields(username = %user.0.username, user_id = %user.0.user_id))]
pub async fn update_habit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<HabitRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    // ---
    let Json(mut request) = body?;

    let body_id = request.id.take().unwrap_or_default();
    if !same_id(&id, &body_id) {
        tracing::warn!("Path id {} does not match body id '{}'", id, body_id);
        return Err(ApiError::bad_request());
    }

    let fields = request.into_fields()?;
    let id = parse_id(&id)?;

    state
        .repository()
        .update_habit(id, fields)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update habit {}: {}", id, e);
            ApiError::BadRequest(e.to_string())
        })?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated habit {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/habits/{id}
///
/// Requires a session.
///
/// - `204 No Content` if the habit was deleted.
/// - `404 Not Found` if no habit exists with the given ID.
/// - `401 Unauthorized` without a valid session token.
#[utoipa::path(
    delete,
    path = "/api/v1/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit identifier")),
    security(("SessionCookie" = []), ("BearerToken" = [])),
    responses(
        (status = 204, description = "Habit deleted"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "No such habit", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, user), fields(username = %user.0.username, user_id = %user.0.user_id))]
pub async fn delete_habit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // ---
    let id = parse_id(&id)?;

    let deleted = state.repository().delete_habit(id).await.map_err(|e| {
        tracing::error!("Failed to delete habit {}: {}", id, e);
        ApiError::Internal
    })?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted habit {}", id);

    Ok(StatusCode::NO_CONTENT)
}
