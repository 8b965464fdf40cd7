mod common;

use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{header, Method, Request, Response, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

use courseloom::dto::api::{ErrorResponse, ProgressResponse};
use courseloom::utils::cookies::Flash;

use common::{setup_test_app, setup_test_app_with_backend, test_router};

/// Mock course backend that only knows shell courses, so the portal has to
/// derive all content itself.
async fn spawn_shell_backend() -> String {
    let app = Router::new()
        .route("/health/", get(|| async { Json(json!({ "status": "ok" })) }))
        .route(
            "/api/courses/",
            get(|| async {
                Json(json!({
                    "success": true,
                    "courses": [{ "id": "c7", "topic": "Music Theory" }]
                }))
            }),
        )
        .route(
            "/api/courses/:id/",
            get(|Path(id): Path<String>| async move {
                Json(json!({ "id": id, "topic": "Music Theory" }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// A proper flash was planted (not just the clearing cookie).
fn has_flash(response: &Response<Body>) -> bool {
    set_cookies(response)
        .iter()
        .any(|c| c.starts_with("cl_flash=") && !c.starts_with("cl_flash=;"))
}

#[tokio::test]
async fn home_page_renders() {
    let app = setup_test_app();
    let response = test_router(&app).oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Generate Course"));
    assert!(body.contains("Courseloom"));
}

#[tokio::test]
async fn home_page_previews_topic_difficulty() {
    let app = setup_test_app();
    let response = test_router(&app)
        .oneshot(get_request("/?topic=Quantum%20Physics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Quantum Physics"));
    assert!(body.contains("Advanced"));
}

#[tokio::test]
async fn static_pages_render() {
    let app = setup_test_app();

    let about = test_router(&app).oneshot(get_request("/about")).await.unwrap();
    assert_eq!(about.status(), StatusCode::OK);
    assert!(body_string(about).await.contains("About Courseloom"));

    let contact = test_router(&app).oneshot(get_request("/contact")).await.unwrap();
    assert_eq!(contact.status(), StatusCode::OK);
    assert!(body_string(contact).await.contains("Contact us"));
}

#[tokio::test]
async fn unknown_route_renders_not_found_page() {
    let app = setup_test_app();
    let response = test_router(&app)
        .oneshot(get_request("/no/such/page"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("404"));
    assert!(body.contains("/no/such/page"));
}

#[tokio::test]
async fn legacy_course_path_redirects_permanently() {
    let app = setup_test_app();
    let response = test_router(&app)
        .oneshot(get_request("/course/abc-123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/courses/abc-123");
}

#[tokio::test]
async fn courses_page_shows_disconnected_panel_without_backend() {
    let app = setup_test_app();
    let response = test_router(&app).oneshot(get_request("/courses")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Course service unreachable"));
    assert!(body.contains("Retry"));
}

#[tokio::test]
async fn course_detail_redirects_home_when_backend_down() {
    let app = setup_test_app();
    let response = test_router(&app)
        .oneshot(get_request("/courses/5f0c9de1-6ca6-4c0f-80d7-1a3c6f2a9b11"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses");
    assert!(has_flash(&response));
}

#[tokio::test]
async fn api_courses_reports_backend_unreachable() {
    let app = setup_test_app();
    let response = test_router(&app).oneshot(get_request("/api/courses")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.error, "backend_unreachable");
}

#[tokio::test]
async fn progress_endpoint_returns_empty_document_for_untracked_course() {
    let app = setup_test_app();
    let response = test_router(&app)
        .oneshot(get_request("/api/courses/untracked/progress"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let progress: ProgressResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(progress.course_id, "untracked");
    assert_eq!(progress.percentage, 0);
    assert!(progress.completed_lessons.is_empty());
    assert!(!progress.bookmarked);
    assert_eq!(progress.rating, None);
}

async fn fetch_progress(app: &common::TestApp, course_id: &str) -> ProgressResponse {
    let response = test_router(app)
        .oneshot(get_request(&format!("/api/courses/{}/progress", course_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn toggling_a_lesson_persists_progress() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_request("/courses/c1/lessons/m1-l1/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses/c1");

    let progress = fetch_progress(&app, "c1").await;
    assert_eq!(progress.completed_lessons, vec!["m1-l1".to_string()]);
    // 1 of 16 outline lessons, rounded.
    assert_eq!(progress.percentage, 6);
}

#[tokio::test]
async fn fourth_lesson_crosses_the_first_milestone_once() {
    let app = setup_test_app();

    for (index, lesson) in ["m1-l1", "m1-l2", "m1-l3", "m1-l4"].iter().enumerate() {
        let response = test_router(&app)
            .oneshot(post_request(&format!("/courses/c2/lessons/{}/toggle", lesson)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        if index < 3 {
            assert!(!has_flash(&response), "no milestone before 25%");
        } else {
            assert!(has_flash(&response), "crossing 25% must notify");
        }
    }

    let progress = fetch_progress(&app, "c2").await;
    assert_eq!(progress.percentage, 25);

    // Toggling one lesson back off drops below the milestone silently.
    let response = test_router(&app)
        .oneshot(post_request("/courses/c2/lessons/m1-l4/toggle"))
        .await
        .unwrap();
    assert!(!has_flash(&response));

    let progress = fetch_progress(&app, "c2").await;
    assert_eq!(progress.percentage, 19);
}

#[tokio::test]
async fn unknown_lesson_id_is_rejected() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_request("/courses/c3/lessons/m9-l9/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(has_flash(&response));

    let progress = fetch_progress(&app, "c3").await;
    assert!(progress.completed_lessons.is_empty());
}

#[tokio::test]
async fn bookmark_and_rating_round_trip() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_request("/courses/c4/bookmark"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = test_router(&app)
        .oneshot(post_form("/courses/c4/rate", "stars=4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let progress = fetch_progress(&app, "c4").await;
    assert!(progress.bookmarked);
    assert_eq!(progress.rating, Some(4));

    // Second bookmark post removes it.
    test_router(&app)
        .oneshot(post_request("/courses/c4/bookmark"))
        .await
        .unwrap();
    let progress = fetch_progress(&app, "c4").await;
    assert!(!progress.bookmarked);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_form("/courses/c5/rate", "stars=9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(has_flash(&response));

    let progress = fetch_progress(&app, "c5").await;
    assert_eq!(progress.rating, None);
}

#[tokio::test]
async fn create_course_rejects_short_topics() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_form("/courses", "topic=ab"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(has_flash(&response));
}

#[tokio::test]
async fn topic_bounds_count_characters_not_bytes() {
    let app = setup_test_app();

    // Two CJK characters span six bytes but are still too short a topic.
    let response = test_router(&app)
        .oneshot(post_form("/courses", "topic=%E6%97%A5%E6%9C%AC"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(has_flash(&response));

    // Seventy CJK characters span 210 bytes yet sit inside the 200-char
    // bound, so validation passes and the request reaches the backend.
    let body = format!("topic={}", "%E5%AD%A6".repeat(70));
    let response = test_router(&app)
        .oneshot(post_form("/courses", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses");
}

#[tokio::test]
async fn theme_toggle_flips_the_cookie() {
    let app = setup_test_app();

    let response = test_router(&app).oneshot(post_request("/theme")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("cl_theme=dark")));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/theme")
        .header(header::COOKIE, "cl_theme=dark")
        .body(Body::empty())
        .unwrap();
    let response = test_router(&app).oneshot(request).await.unwrap();
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("cl_theme=light")));
}

#[tokio::test]
async fn theme_toggle_only_bounces_to_local_paths() {
    let app = setup_test_app();

    let bounce = |referer: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/theme")
            .header(header::REFERER, referer)
            .body(Body::empty())
            .unwrap()
    };

    // A normal Referer keeps the learner on the page they toggled from.
    let response = test_router(&app)
        .oneshot(bounce("http://localhost:3000/courses/c9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses/c9");

    // Foreign origins are stripped to their path.
    let response = test_router(&app)
        .oneshot(bounce("https://evil.example/phish"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/phish");

    // Protocol-relative and non-URL values fall back to home.
    let response = test_router(&app)
        .oneshot(bounce("//evil.example/phish"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    let response = test_router(&app)
        .oneshot(bounce("javascript:alert(1)"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn contact_form_validates_and_acknowledges() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_form("/contact", "name=Ada&email=ada%40example.com&message=short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(has_flash(&response));

    let response = test_router(&app)
        .oneshot(post_form(
            "/contact",
            "name=Ada&email=ada%40example.com&message=The%20quiz%20on%20my%20course%20graded%20oddly.",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact");
    assert!(has_flash(&response));
}

#[tokio::test]
async fn pending_flash_is_rendered_and_cleared() {
    let app = setup_test_app();

    let cookie = Flash::success("Saved!").set_cookie();
    let cookie_pair = cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/about")
        .header(header::COOKIE, cookie_pair)
        .body(Body::empty())
        .unwrap();
    let response = test_router(&app).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("cl_flash=;"));
    assert!(cleared, "consumed flash must be cleared");

    let body = body_string(response).await;
    assert!(body.contains("Saved!"));
}

#[tokio::test]
async fn quiz_submission_needs_the_backend() {
    let app = setup_test_app();

    let response = test_router(&app)
        .oneshot(post_form(
            "/courses/c6/lessons/m4-l4/quiz",
            "q0=1&q1=2&q2=1&q3=0&q4=3",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses/c6");
    assert!(has_flash(&response));

    let progress = fetch_progress(&app, "c6").await;
    assert!(progress.quiz_results.is_empty());
}

#[tokio::test]
async fn shell_courses_render_the_derived_outline() {
    let backend = spawn_shell_backend().await;
    let app = setup_test_app_with_backend(backend);

    let response = test_router(&app).oneshot(get_request("/courses/c7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Music Theory"));
    assert!(body.contains("Foundations of Music Theory"));
    assert!(body.contains("Module 4"));
    assert!(body.contains("Check your understanding"));
}

#[tokio::test]
async fn quiz_submission_rejects_partial_answer_sheets() {
    let backend = spawn_shell_backend().await;
    let app = setup_test_app_with_backend(backend);

    let response = test_router(&app)
        .oneshot(post_form("/courses/c7/lessons/m4-l4/quiz", "q0=1&q1=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(has_flash(&response));

    let progress = fetch_progress(&app, "c7").await;
    assert!(progress.quiz_results.is_empty());
}

#[tokio::test]
async fn quiz_submission_grades_and_persists() {
    let backend = spawn_shell_backend().await;
    let app = setup_test_app_with_backend(backend);

    let response = test_router(&app)
        .oneshot(post_form(
            "/courses/c7/lessons/m4-l4/quiz",
            "q0=1&q1=2&q2=1&q3=0&q4=3",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/courses/c7");
    assert!(has_flash(&response));

    let progress = fetch_progress(&app, "c7").await;
    assert_eq!(progress.quiz_results.len(), 1);
    assert_eq!(progress.quiz_results[0].lesson_id, "m4-l4");
    assert_eq!(progress.quiz_results[0].score, 5);
    assert_eq!(progress.quiz_results[0].percentage, 100);

    // A retry clears the stored result.
    let response = test_router(&app)
        .oneshot(post_request("/courses/c7/lessons/m4-l4/quiz/retry"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let progress = fetch_progress(&app, "c7").await;
    assert!(progress.quiz_results.is_empty());
}

#[tokio::test]
async fn health_endpoint_answers() {
    let app = setup_test_app();
    let response = test_router(&app).oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("healthy"));
}
