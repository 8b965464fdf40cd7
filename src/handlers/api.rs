//! JSON API consumed by the course-search script and external callers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::error;

use crate::dto::api::{CourseListResponse, CourseSummary, ErrorResponse, ProgressResponse};
use crate::dto::forms::SearchQuery;
use crate::models::course::Course;
use crate::services::api_client::ApiError;
use crate::AppState;

fn api_error(e: &ApiError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, error) = match e {
        ApiError::Disconnected | ApiError::Transport(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "backend_unreachable")
        }
        ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        _ => (StatusCode::BAD_GATEWAY, "backend_error"),
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: e.to_string(),
        }),
    )
}

async fn summarize(state: &AppState, mut courses: Vec<Course>) -> CourseListResponse {
    courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let ids: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();
    let progress = state.store.load_many(&ids).await;
    let courses = CourseSummary::collect(&courses, &progress);

    CourseListResponse {
        total_count: courses.len(),
        courses,
    }
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "Course list with local progress", body = CourseListResponse),
        (status = 503, description = "Course backend unreachable", body = ErrorResponse)
    ),
    tag = "courses"
)]
pub async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    match state.api.list_courses().await {
        Ok(courses) => (StatusCode::OK, Json(summarize(&state, courses).await)).into_response(),
        Err(e) => {
            error!("Course listing failed: {}", e);
            api_error(&e).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/courses/search",
    params(
        ("q" = String, Query, description = "Case-insensitive match against topic and description")
    ),
    responses(
        (status = 200, description = "Matching courses", body = CourseListResponse),
        (status = 503, description = "Course backend unreachable", body = ErrorResponse)
    ),
    tag = "courses"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let q = query.q.trim();

    // An empty query is the full listing.
    let result = if q.is_empty() {
        state.api.list_courses().await
    } else {
        state.api.search_courses(q).await
    };

    match result {
        Ok(courses) => (StatusCode::OK, Json(summarize(&state, courses).await)).into_response(),
        Err(e) => {
            error!("Course search failed: {}", e);
            api_error(&e).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/progress",
    params(
        ("id" = String, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Local progress for the course", body = ProgressResponse)
    ),
    tag = "courses"
)]
pub async fn course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    // Untracked courses answer with the empty document rather than a 404;
    // "no progress yet" is a normal state.
    let progress = state.store.load(&course_id).await;
    (StatusCode::OK, Json(ProgressResponse::from(progress)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health and backend connectivity")
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.api.active_endpoint().await;

    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.app.name,
        "version": state.config.app.version,
        "backend_endpoint": backend,
    }))
}
