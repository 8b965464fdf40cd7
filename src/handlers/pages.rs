//! Server-rendered page handlers.
//!
//! Every page reads the theme and any pending flash out of the request
//! cookies, renders its template, and clears a consumed flash in the same
//! response.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::dto::api::CourseSummary;
use crate::dto::forms::{HomeQuery, SearchQuery};
use crate::services::{api_client::ApiError, content};
use crate::templates::{
    milestone_views, module_views, star_views, status_label, suggestion_views, AboutTemplate,
    CertificateTemplate, ContactTemplate, CourseDetailTemplate, CoursesTemplate, IndexTemplate,
    NotFoundTemplate, PreviewView,
};
use crate::utils::cookies::{Flash, Theme};
use crate::AppState;

use super::{clear_consumed_flash, moved_permanently, redirect_with_flash};

fn page_chrome(headers: &HeaderMap) -> (&'static str, Option<Flash>) {
    let theme = Theme::from_headers(headers).as_str();
    let flash = Flash::from_headers(headers);
    (theme, flash)
}

fn render(template: impl IntoResponse, consumed_flash: bool) -> Response {
    let response = template.into_response();
    if consumed_flash {
        clear_consumed_flash(response)
    } else {
        response
    }
}

pub async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
    headers: HeaderMap,
) -> Response {
    let (theme, flash) = page_chrome(&headers);

    // Catalog totals are decoration; a dead backend must not break the
    // landing page.
    let total_courses = match state.api.stats().await {
        Ok(stats) => Some(stats.total_courses),
        Err(e) => {
            warn!("Catalog stats unavailable: {}", e);
            None
        }
    };

    let preview = query
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(PreviewView::derive);

    let consumed = flash.is_some();
    let template = IndexTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "home",
        total_courses,
        suggestions: suggestion_views(),
        preview,
    };

    render(template, consumed)
}

pub async fn courses_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
) -> Response {
    let (theme, flash) = page_chrome(&headers);
    let consumed = flash.is_some();
    let q = query.q.trim().to_string();

    let listing = if q.is_empty() {
        state.api.list_courses().await
    } else {
        state.api.search_courses(&q).await
    };

    let (connected, courses) = match listing {
        Ok(mut courses) => {
            // Newest first; courses without a creation time sink to the end.
            courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let ids: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();
            let progress = state.store.load_many(&ids).await;

            (true, CourseSummary::collect(&courses, &progress))
        }
        Err(e) => {
            error!("Course listing unavailable: {}", e);
            (false, Vec::new())
        }
    };

    let total = courses.len();
    let template = CoursesTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "courses",
        connected,
        courses,
        total,
        query: q,
    };

    render(template, consumed)
}

pub async fn course_detail_page(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (theme, flash) = page_chrome(&headers);

    let mut course = match state.api.get_course(&course_id).await {
        Ok(course) => course,
        Err(ApiError::NotFound) => {
            return render(
                not_found_template(theme, format!("/courses/{}", course_id)),
                flash.is_some(),
            );
        }
        Err(e) => {
            error!("Course fetch failed for {}: {}", course_id, e);
            return redirect_with_flash("/courses", Flash::error(e.user_message()));
        }
    };

    // Shell courses (still generating, or a backend that only stores
    // metadata) get the derived outline so the page is never empty.
    if !course.has_content() {
        course.modules = content::synthesize_course_content(&course.topic);

        if let Some(videos) = &state.videos {
            match videos.search(&course.topic).await {
                Ok(found) if !found.is_empty() => {
                    content::distribute_videos(&mut course.modules, found)
                }
                Ok(_) => {}
                Err(e) => warn!("Video search failed for {}: {}", course.topic, e),
            }
        }
    }

    let progress = state.store.load(&course_id).await;
    let total_lessons = course.total_lessons();
    let completed_count = course
        .modules
        .iter()
        .flat_map(|m| m.lessons.iter())
        .filter(|lesson| progress.is_completed(&lesson.id))
        .count();

    let consumed = flash.is_some();
    let template = CourseDetailTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "courses",
        course_id: course.id.clone(),
        topic: content::title_case(&course.topic),
        description: course.description.clone(),
        status_label: status_label(&course.status),
        generating: course.status.in_progress(),
        icon: content::topic_icon(&course.topic),
        difficulty: content::classify_difficulty(&course.topic).as_str(),
        modules: module_views(&course, &progress),
        percentage: progress.percentage,
        completed_count,
        total_lessons,
        bookmarked: progress.bookmarked,
        stars: star_views(progress.rating.unwrap_or(0)),
        milestones: milestone_views(progress.percentage),
        certificate_unlocked: progress.certificate_unlocked(),
    };

    render(template, consumed)
}

/// The detail page used to live at `/course/{id}`.
pub async fn legacy_course_redirect(Path(course_id): Path<String>) -> Response {
    moved_permanently(&format!("/courses/{}", course_id))
}

pub async fn certificate_page(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (theme, flash) = page_chrome(&headers);

    let progress = state.store.load(&course_id).await;
    if !progress.certificate_unlocked() {
        return redirect_with_flash(
            &format!("/courses/{}", course_id),
            Flash::warning("Finish every lesson to unlock your certificate."),
        );
    }

    let course = match state.api.get_course(&course_id).await {
        Ok(course) => course,
        Err(e) => {
            error!("Course fetch failed for certificate {}: {}", course_id, e);
            return redirect_with_flash("/courses", Flash::error(e.user_message()));
        }
    };

    let total_lessons = if course.has_content() {
        course.total_lessons()
    } else {
        content::outline_lesson_count()
    };

    let consumed = flash.is_some();
    let template = CertificateTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "courses",
        course_id: course.id.clone(),
        topic: content::title_case(&course.topic),
        icon: content::topic_icon(&course.topic),
        difficulty: content::classify_difficulty(&course.topic).as_str(),
        total_lessons,
        completed_on: progress.updated_at.format("%B %-d, %Y").to_string(),
    };

    render(template, consumed)
}

pub async fn about_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (theme, flash) = page_chrome(&headers);
    let consumed = flash.is_some();

    let template = AboutTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "about",
        version: state.config.app.version.clone(),
    };

    render(template, consumed)
}

pub async fn contact_page(headers: HeaderMap) -> Response {
    let (theme, flash) = page_chrome(&headers);
    let consumed = flash.is_some();

    let template = ContactTemplate {
        theme,
        flash: flash.map(Into::into),
        active: "contact",
    };

    render(template, consumed)
}

fn not_found_template(theme: &'static str, path: String) -> (StatusCode, NotFoundTemplate) {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            theme,
            flash: None,
            active: "",
            path,
        },
    )
}

/// Router fallback for anything unmatched.
pub async fn not_found_page(headers: HeaderMap, uri: Uri) -> Response {
    let (theme, flash) = page_chrome(&headers);
    render(not_found_template(theme, uri.path().to_string()), flash.is_some())
}
