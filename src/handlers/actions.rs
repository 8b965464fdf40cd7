//! Form-post handlers. Every mutation answers with a 303 redirect and, when
//! there is something to say, a one-shot flash cookie.

use std::collections::HashMap;

use axum::extract::{Form, Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{error, info, warn};

use crate::dto::forms::{ContactForm, RateForm, TopicForm};
use crate::models::progress::{QuizTier, ToggleOutcome};
use crate::services::content;
use crate::utils::cookies::{Flash, Theme};
use crate::AppState;

use super::redirect_with_flash;

/// Who course generations are attributed to on the backend.
const WEB_CREATOR: &str = "web_user";

pub async fn create_course(
    State(state): State<AppState>,
    Form(form): Form<TopicForm>,
) -> Response {
    let topic = form.topic.trim();

    let length = topic.chars().count();
    if length < 3 || length > 200 {
        return redirect_with_flash(
            "/",
            Flash::warning("Topics need to be between 3 and 200 characters."),
        );
    }

    match state.api.create_course(topic, WEB_CREATOR).await {
        Ok(course) => {
            info!("Course {} created for topic: {}", course.id, topic);
            redirect_with_flash(
                &format!("/courses/{}", course.id),
                Flash::success(format!(
                    "Your course on {} is on its way!",
                    content::title_case(topic)
                )),
            )
        }
        Err(e) => {
            error!("Course creation failed for {}: {}", topic, e);
            redirect_with_flash("/courses", Flash::error(e.user_message()))
        }
    }
}

fn milestone_flash(outcome: &ToggleOutcome) -> Option<Flash> {
    let top = outcome.crossed.iter().copied().max()?;
    let message = match top {
        100 => "🏆 Course complete! Your certificate is unlocked.",
        75 => "💪 75% complete, the finish line is in sight!",
        50 => "🔥 Halfway there: 50% complete!",
        _ => "🎉 25% complete. Great start!",
    };

    Some(Flash::success(message))
}

pub async fn toggle_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Response {
    let detail = format!("/courses/{}", course_id);

    // Confirm the lesson exists before recording it. When the backend is
    // unreachable the derived outline is the best reference we have.
    let (known_lesson, total_lessons) = match state.api.get_course(&course_id).await {
        Ok(mut course) => {
            content::ensure_content(&mut course);
            (course.lesson(&lesson_id).is_some(), course.total_lessons())
        }
        Err(e) => {
            warn!("Toggling {} without backend confirmation: {}", lesson_id, e);
            (
                content::outline_contains(&lesson_id),
                content::outline_lesson_count(),
            )
        }
    };

    if !known_lesson {
        return redirect_with_flash(
            &detail,
            Flash::error("That lesson doesn't exist in this course."),
        );
    }

    match state
        .store
        .update(&course_id, |progress| {
            progress.toggle_lesson(&lesson_id, total_lessons)
        })
        .await
    {
        Ok(outcome) => match milestone_flash(&outcome) {
            Some(flash) => redirect_with_flash(&detail, flash),
            None => Redirect::to(&detail).into_response(),
        },
        Err(e) => {
            error!("Failed to persist progress for {}: {}", course_id, e);
            redirect_with_flash(
                &detail,
                Flash::error("Couldn't save your progress. Please try again."),
            )
        }
    }
}

pub async fn submit_quiz(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(String, String)>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let detail = format!("/courses/{}", course_id);

    let mut course = match state.api.get_course(&course_id).await {
        Ok(course) => course,
        Err(e) => {
            error!("Course fetch failed while grading quiz: {}", e);
            return redirect_with_flash(&detail, Flash::error(e.user_message()));
        }
    };
    content::ensure_content(&mut course);

    let quiz = match course.lesson(&lesson_id).and_then(|l| l.quiz.clone()) {
        Some(quiz) if !quiz.is_empty() => quiz,
        _ => {
            return redirect_with_flash(&detail, Flash::error("This lesson has no quiz."));
        }
    };

    // The form posts one `q{i}` radio per question; reject partial sheets.
    let mut answers = Vec::with_capacity(quiz.len());
    for (index, question) in quiz.questions.iter().enumerate() {
        let answer = form
            .get(&format!("q{}", index))
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|answer| *answer < question.options.len());

        match answer {
            Some(answer) => answers.push(answer),
            None => {
                return redirect_with_flash(
                    &detail,
                    Flash::warning("Please answer every question before submitting."),
                );
            }
        }
    }

    let result = quiz.grade(&answers);

    if let Err(e) = state
        .store
        .update(&course_id, |progress| {
            progress.record_quiz(&lesson_id, result)
        })
        .await
    {
        error!("Failed to persist quiz result for {}: {}", course_id, e);
        return redirect_with_flash(
            &detail,
            Flash::error("Couldn't save your quiz result. Please try again."),
        );
    }

    let summary = format!(
        "{}/{} correct. {}",
        result.score,
        result.total,
        result.tier().message()
    );
    let flash = match result.tier() {
        QuizTier::Excellent => Flash::success(summary),
        QuizTier::Good => Flash::info(summary),
        QuizTier::KeepPracticing => Flash::warning(summary),
    };

    redirect_with_flash(&detail, flash)
}

pub async fn retry_quiz(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Response {
    let detail = format!("/courses/{}", course_id);

    match state
        .store
        .update(&course_id, |progress| progress.reset_quiz(&lesson_id))
        .await
    {
        Ok(true) => redirect_with_flash(&detail, Flash::info("Quiz reset. Give it another shot!")),
        Ok(false) => Redirect::to(&detail).into_response(),
        Err(e) => {
            error!("Failed to reset quiz for {}: {}", course_id, e);
            redirect_with_flash(&detail, Flash::error("Couldn't reset the quiz. Please try again."))
        }
    }
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Response {
    let detail = format!("/courses/{}", course_id);

    match state
        .store
        .update(&course_id, |progress| progress.toggle_bookmark())
        .await
    {
        Ok(true) => redirect_with_flash(&detail, Flash::success("Course bookmarked.")),
        Ok(false) => redirect_with_flash(&detail, Flash::info("Bookmark removed.")),
        Err(e) => {
            error!("Failed to persist bookmark for {}: {}", course_id, e);
            redirect_with_flash(&detail, Flash::error("Couldn't save the bookmark. Please try again."))
        }
    }
}

pub async fn rate_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Form(form): Form<RateForm>,
) -> Response {
    let detail = format!("/courses/{}", course_id);

    if !(1..=5).contains(&form.stars) {
        return redirect_with_flash(&detail, Flash::error("Ratings go from 1 to 5 stars."));
    }

    match state
        .store
        .update(&course_id, |progress| progress.set_rating(form.stars))
        .await
    {
        Ok(()) => redirect_with_flash(
            &detail,
            Flash::success(format!(
                "Thanks! You rated this course {} star{}.",
                form.stars,
                if form.stars == 1 { "" } else { "s" }
            )),
        ),
        Err(e) => {
            error!("Failed to persist rating for {}: {}", course_id, e);
            redirect_with_flash(&detail, Flash::error("Couldn't save your rating. Please try again."))
        }
    }
}

/// Reduce a Referer value to a same-origin path. Absolute URLs keep only
/// their path and query; anything else falls back to the home page so the
/// redirect can never leave the site.
fn bounce_path(referer: &str) -> String {
    let path = match referer.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => referer,
    };
    if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") {
        path.to_string()
    } else {
        "/".to_string()
    }
}

/// Flip the light/dark preference and bounce back to the page the learner
/// was on.
pub async fn toggle_theme(headers: HeaderMap) -> Response {
    let next = Theme::from_headers(&headers).toggled();

    let back = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "/".to_string(), bounce_path);

    let mut response = Redirect::to(&back).into_response();
    if let Ok(value) = HeaderValue::from_str(&next.set_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

pub async fn submit_contact(Form(form): Form<ContactForm>) -> Response {
    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() || email.is_empty() || message.chars().count() < 10 {
        return redirect_with_flash(
            "/contact",
            Flash::warning("Please fill in your name, email and a message of at least 10 characters."),
        );
    }

    // There is no mailbox behind this; the submission is recorded in the
    // server log for the operators.
    info!("Contact message from {} <{}>: {} chars", name, email, message.len());

    redirect_with_flash(
        "/contact",
        Flash::success("Thanks for reaching out. We'll get back to you soon!"),
    )
}
