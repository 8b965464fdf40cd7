pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod services;
pub mod templates;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use services::api_client::CourseApi;
pub use services::progress::ProgressStore;
pub use services::video_search::VideoSearch;

#[derive(Clone)]
pub struct AppState {
    /// Client for the course-generation backend.
    pub api: CourseApi,
    /// Local per-course progress store.
    pub store: ProgressStore,
    /// Optional external video search; None keeps the derived placeholders.
    pub videos: Option<VideoSearch>,
    /// Application configuration.
    pub config: Arc<AppConfig>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::api::list_courses,
        handlers::api::search_courses,
        handlers::api::course_progress,
        handlers::api::health,
    ),
    components(schemas(
        dto::api::CourseSummary,
        dto::api::CourseListResponse,
        dto::api::ProgressResponse,
        dto::api::QuizResultResponse,
        dto::api::ErrorResponse
    )),
    tags(
        (name = "courses", description = "Course catalog and local progress"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    // Server-rendered pages
    let page_routes = Router::new()
        .route("/", get(handlers::pages::home_page))
        .route("/courses", get(handlers::pages::courses_page))
        .route("/courses/:id", get(handlers::pages::course_detail_page))
        .route("/course/:id", get(handlers::pages::legacy_course_redirect))
        .route("/courses/:id/certificate", get(handlers::pages::certificate_page))
        .route("/about", get(handlers::pages::about_page))
        .route("/contact", get(handlers::pages::contact_page));

    // Form posts
    let action_routes = Router::new()
        .route("/courses", post(handlers::actions::create_course))
        .route(
            "/courses/:id/lessons/:lesson_id/toggle",
            post(handlers::actions::toggle_lesson),
        )
        .route(
            "/courses/:id/lessons/:lesson_id/quiz",
            post(handlers::actions::submit_quiz),
        )
        .route(
            "/courses/:id/lessons/:lesson_id/quiz/retry",
            post(handlers::actions::retry_quiz),
        )
        .route("/courses/:id/bookmark", post(handlers::actions::toggle_bookmark))
        .route("/courses/:id/rate", post(handlers::actions::rate_course))
        .route("/theme", post(handlers::actions::toggle_theme))
        .route("/contact", post(handlers::actions::submit_contact));

    // JSON API
    let api_routes = Router::new()
        .route("/api/courses", get(handlers::api::list_courses))
        .route("/api/courses/search", get(handlers::api::search_courses))
        .route("/api/courses/:id/progress", get(handlers::api::course_progress))
        .route("/health", get(handlers::api::health));

    // Static assets - no state required
    let static_routes = Router::new().nest_service("/static", ServeDir::new("static"));

    // API documentation - Swagger UI
    let api_docs_routes = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    Router::new()
        .merge(page_routes)
        .merge(action_routes)
        .merge(api_routes)
        .merge(static_routes)
        .merge(api_docs_routes)
        .fallback(handlers::pages::not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
