//! Askama page templates and the view models that feed them.
//!
//! Handlers shape domain types into these flat structs so the HTML stays
//! free of non-trivial expressions; every page shares the `theme`, `flash`
//! and `active` fields consumed by `base.html`.

use askama::Template;

use crate::dto::api::CourseSummary;
use crate::models::course::{Course, CourseStatus, LessonType, VideoRef};
use crate::models::progress::{CourseProgress, QuizTier, MILESTONES};
use crate::services::content;
use crate::utils::cookies::Flash;

/// Flash payload flattened for rendering.
#[derive(Debug, Clone)]
pub struct FlashView {
    pub level: &'static str,
    pub message: String,
}

impl From<Flash> for FlashView {
    fn from(flash: Flash) -> Self {
        Self {
            level: flash.level.as_str(),
            message: flash.message,
        }
    }
}

/// Topic shortcut chip on the home page.
pub struct SuggestionView {
    pub topic: &'static str,
    pub icon: &'static str,
    pub difficulty: &'static str,
}

pub fn suggestion_views() -> Vec<SuggestionView> {
    content::SUGGESTED_TOPICS
        .iter()
        .map(|topic| SuggestionView {
            topic,
            icon: content::topic_icon(topic),
            difficulty: content::classify_difficulty(topic).as_str(),
        })
        .collect()
}

/// Derived preview of a topic before the learner commits to generating it.
pub struct PreviewView {
    pub topic: String,
    pub icon: &'static str,
    pub difficulty: &'static str,
    pub lesson_count: usize,
}

impl PreviewView {
    pub fn derive(topic: &str) -> Self {
        Self {
            topic: content::title_case(topic),
            icon: content::topic_icon(topic),
            difficulty: content::classify_difficulty(topic).as_str(),
            lesson_count: content::outline_lesson_count(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    pub total_courses: Option<u64>,
    pub suggestions: Vec<SuggestionView>,
    pub preview: Option<PreviewView>,
}

#[derive(Template)]
#[template(path = "courses.html")]
pub struct CoursesTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    /// False renders the disconnected panel instead of the course grid.
    pub connected: bool,
    pub courses: Vec<CourseSummary>,
    pub total: usize,
    /// Server-side `?q=` filter currently applied, if any.
    pub query: String,
}

#[derive(Template)]
#[template(path = "course_detail.html")]
pub struct CourseDetailTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    pub course_id: String,
    pub topic: String,
    pub description: String,
    pub status_label: &'static str,
    pub generating: bool,
    pub icon: &'static str,
    pub difficulty: &'static str,
    pub modules: Vec<ModuleView>,
    pub percentage: u8,
    pub completed_count: usize,
    pub total_lessons: usize,
    pub bookmarked: bool,
    pub stars: Vec<StarView>,
    pub milestones: Vec<MilestoneView>,
    pub certificate_unlocked: bool,
}

#[derive(Template)]
#[template(path = "certificate.html")]
pub struct CertificateTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    pub course_id: String,
    pub topic: String,
    pub icon: &'static str,
    pub difficulty: &'static str,
    pub total_lessons: usize,
    pub completed_on: String,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    pub version: String,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub theme: &'static str,
    pub flash: Option<FlashView>,
    pub active: &'static str,
    pub path: String,
}

/// One accordion section on the course detail page.
pub struct ModuleView {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub completed_count: usize,
    pub lesson_count: usize,
    pub lessons: Vec<LessonView>,
    /// First module with unfinished lessons starts expanded.
    pub open: bool,
}

pub struct LessonView {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub kind_label: &'static str,
    pub kind_icon: &'static str,
    pub completed: bool,
    pub objectives: Vec<String>,
    pub key_concepts: Vec<String>,
    pub videos: Vec<VideoRef>,
    pub quiz: Option<QuizView>,
}

pub struct QuizView {
    pub lesson_id: String,
    pub questions: Vec<QuizQuestionView>,
    pub result: Option<QuizResultView>,
}

pub struct QuizQuestionView {
    /// Zero-based position, used to group the radio inputs.
    pub number: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_text: String,
    pub explanation: String,
}

/// One star in the rating control.
pub struct StarView {
    pub value: u8,
    pub filled: bool,
}

pub fn star_views(rating: u8) -> Vec<StarView> {
    (1..=5)
        .map(|value| StarView {
            value,
            filled: value <= rating,
        })
        .collect()
}

/// One row of the milestone checklist in the progress sidebar.
pub struct MilestoneView {
    pub threshold: u8,
    pub reached: bool,
}

pub fn milestone_views(percentage: u8) -> Vec<MilestoneView> {
    MILESTONES
        .iter()
        .map(|&threshold| MilestoneView {
            threshold,
            reached: percentage >= threshold,
        })
        .collect()
}

pub struct QuizResultView {
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
    pub tier_class: &'static str,
    pub message: &'static str,
}

pub fn status_label(status: &CourseStatus) -> &'static str {
    match status {
        CourseStatus::Created => "Queued",
        CourseStatus::Generating => "Generating",
        CourseStatus::Completed => "Ready",
        CourseStatus::Failed => "Failed",
    }
}

fn lesson_kind(lesson_type: &LessonType) -> (&'static str, &'static str) {
    match lesson_type {
        LessonType::Video => ("Video", "▶"),
        LessonType::Text => ("Reading", "📖"),
        LessonType::Practice => ("Practice", "✏"),
    }
}

/// Shape a course's modules plus the learner's progress into accordion
/// sections. The first module that still has unfinished lessons opens by
/// default so the learner lands where they left off.
pub fn module_views(course: &Course, progress: &CourseProgress) -> Vec<ModuleView> {
    let mut first_unfinished_seen = false;

    course
        .modules
        .iter()
        .enumerate()
        .map(|(index, module)| {
            let lessons: Vec<LessonView> = module
                .lessons
                .iter()
                .map(|lesson| {
                    let (kind_label, kind_icon) = lesson_kind(&lesson.lesson_type);

                    LessonView {
                        id: lesson.id.clone(),
                        title: lesson.title.clone(),
                        duration: lesson.duration.clone(),
                        kind_label,
                        kind_icon,
                        completed: progress.is_completed(&lesson.id),
                        objectives: lesson.objectives.clone(),
                        key_concepts: lesson.key_concepts.clone(),
                        videos: lesson.videos.clone(),
                        quiz: lesson.quiz.as_ref().map(|quiz| {
                            let result = progress.quiz_results.get(&lesson.id).map(|r| {
                                let tier = r.tier();
                                QuizResultView {
                                    score: r.score,
                                    total: r.total,
                                    percentage: r.percentage,
                                    tier_class: match tier {
                                        QuizTier::Excellent => "excellent",
                                        QuizTier::Good => "good",
                                        QuizTier::KeepPracticing => "retry",
                                    },
                                    message: tier.message(),
                                }
                            });

                            QuizView {
                                lesson_id: lesson.id.clone(),
                                questions: quiz
                                    .questions
                                    .iter()
                                    .enumerate()
                                    .map(|(number, q)| QuizQuestionView {
                                        number,
                                        prompt: q.prompt.clone(),
                                        options: q.options.clone(),
                                        correct_text: q
                                            .options
                                            .get(q.correct_index)
                                            .cloned()
                                            .unwrap_or_default(),
                                        explanation: q.explanation.clone(),
                                    })
                                    .collect(),
                                result,
                            }
                        }),
                    }
                })
                .collect();

            let completed_count = lessons.iter().filter(|l| l.completed).count();
            let open = !first_unfinished_seen && completed_count < lessons.len();
            if open {
                first_unfinished_seen = true;
            }

            ModuleView {
                index: index + 1,
                title: module.title.clone(),
                description: module.description.clone(),
                completed_count,
                lesson_count: lessons.len(),
                lessons,
                open,
            }
        })
        .collect()
}
