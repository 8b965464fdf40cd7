use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use courseloom::config::BackendConfig;
use courseloom::services::api_client::{ApiError, CourseApi};

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Minimal stand-in for the course-generation backend, bound to an
/// ephemeral port.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/health/", get(|| async { Json(json!({ "status": "ok" })) }))
        .route(
            "/api/courses/",
            get(|| async {
                Json(json!({
                    "success": true,
                    "courses": [
                        { "id": "c-1", "topic": "Chess" },
                        { "id": "c-2", "topic": "Quantum Physics" }
                    ]
                }))
            })
            .post(|| async {
                Json(json!({
                    "success": true,
                    "course": { "id": "c-9", "topic": "Go" }
                }))
            }),
        )
        .route(
            "/api/courses/stats/",
            get(|| async { Json(json!({ "success": true, "total_courses": 42 })) }),
        )
        .route(
            "/api/courses/:id/",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" })))
                        .into_response()
                } else {
                    // Flat shape, no envelope.
                    Json(json!({ "id": id, "topic": "Chess" })).into_response()
                }
            }),
        )
        .route(
            "/api/search-courses/",
            get(|Query(params): Query<SearchParams>| async move {
                let mut courses = Vec::new();
                if "chess".contains(&params.q.to_lowercase()) {
                    courses.push(json!({ "id": "c-1", "topic": "Chess" }));
                }
                Json(json!({ "success": true, "courses": courses }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn config_for(endpoints: Vec<String>) -> BackendConfig {
    BackendConfig {
        endpoints,
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
    }
}

#[tokio::test]
async fn exhausted_candidates_report_disconnected() {
    let api = CourseApi::new(&config_for(vec![
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:2".to_string(),
    ]));

    match api.list_courses().await {
        Err(ApiError::Disconnected) => {}
        other => panic!("expected Disconnected, got {:?}", other.map(|c| c.len())),
    }
    assert!(api.active_endpoint().await.is_none());
}

#[tokio::test]
async fn probing_skips_dead_candidates_and_sticks_with_the_live_one() {
    let live = spawn_backend().await;
    let api = CourseApi::new(&config_for(vec![
        "http://127.0.0.1:1".to_string(),
        live.clone(),
    ]));

    let courses = api.list_courses().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(api.active_endpoint().await, Some(live.clone()));

    // Second call reuses the cached endpoint.
    let courses = api.list_courses().await.unwrap();
    assert_eq!(courses[0].id, "c-1");
    assert_eq!(api.active_endpoint().await, Some(live));
}

#[tokio::test]
async fn single_course_endpoints_normalize_both_wire_shapes() {
    let live = spawn_backend().await;
    let api = CourseApi::new(&config_for(vec![live]));

    // Flat course document.
    let course = api.get_course("c-1").await.unwrap();
    assert_eq!(course.topic, "Chess");

    // Wrapped envelope from creation.
    let created = api.create_course("Go", "web_user").await.unwrap();
    assert_eq!(created.id, "c-9");
}

#[tokio::test]
async fn missing_courses_surface_as_not_found() {
    let live = spawn_backend().await;
    let api = CourseApi::new(&config_for(vec![live]));

    match api.get_course("missing").await {
        Err(ApiError::NotFound) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|c| c.id)),
    }
}

#[tokio::test]
async fn search_is_delegated_to_the_backend() {
    let live = spawn_backend().await;
    let api = CourseApi::new(&config_for(vec![live]));

    let hits = api.search_courses("che").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].topic, "Chess");

    let misses = api.search_courses("calculus").await.unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn stats_come_back_normalized() {
    let live = spawn_backend().await;
    let api = CourseApi::new(&config_for(vec![live]));

    let stats = api.stats().await.unwrap();
    assert_eq!(stats.total_courses, 42);
}
