use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::progress::QuizResult;

/// Generation lifecycle of a course as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Created,
    Generating,
    Completed,
    Failed,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Created => "created",
            CourseStatus::Generating => "generating",
            CourseStatus::Completed => "completed",
            CourseStatus::Failed => "failed",
        }
    }

    /// True while the backend is still producing content for this course.
    pub fn in_progress(&self) -> bool {
        matches!(self, CourseStatus::Created | CourseStatus::Generating)
    }
}

/// Top-level learning unit generated from a user-supplied topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Backend identifier. A UUID in practice, but a malformed id is
    /// tolerated with a warning rather than rejected.
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .find(|l| l.id == lesson_id)
    }

    /// Whether the backend returned actual content or just a shell record.
    pub fn has_content(&self) -> bool {
        !self.modules.is_empty()
    }
}

/// Named grouping of lessons within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    #[default]
    Video,
    Text,
    Practice,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Video => "video",
            LessonType::Text => "text",
            LessonType::Practice => "practice",
        }
    }
}

/// Smallest addressable learning unit; may carry videos, text content and an
/// associated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Human-readable length, e.g. "12 min".
    #[serde(default)]
    pub duration: String,
    #[serde(default, rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub videos: Vec<VideoRef>,
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

/// Reference to an embeddable video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub channel: String,
    pub url: String,
}

/// Ordered question set attached to a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Grade a full answer sheet against the stored correct indices.
    /// `answers[i]` is the selected option index for question `i`; callers
    /// must have validated that every question is answered.
    pub fn grade(&self, answers: &[usize]) -> QuizResult {
        let score = self
            .questions
            .iter()
            .zip(answers.iter())
            .filter(|(question, answer)| question.correct_index == **answer)
            .count() as u32;

        QuizResult::new(score, self.questions.len() as u32)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}
