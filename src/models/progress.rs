use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion percentages that produce a one-time milestone notification
/// when crossed.
pub const MILESTONES: [u8; 4] = [25, 50, 75, 100];

/// Stored outcome of one graded quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
}

impl QuizResult {
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score,
            total,
            percentage: rounded_percentage(score as usize, total as usize),
        }
    }

    pub fn tier(&self) -> QuizTier {
        if self.percentage >= 80 {
            QuizTier::Excellent
        } else if self.percentage >= 60 {
            QuizTier::Good
        } else {
            QuizTier::KeepPracticing
        }
    }
}

/// Outcome tier shown to the learner after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizTier {
    Excellent,
    Good,
    KeepPracticing,
}

impl QuizTier {
    pub fn message(&self) -> &'static str {
        match self {
            QuizTier::Excellent => "Excellent work! You've mastered this material.",
            QuizTier::Good => "Good effort! Review the explanations and keep going.",
            QuizTier::KeepPracticing => "Keep practicing! Revisit the lesson and try again.",
        }
    }
}

/// Everything a lesson-completion toggle changed, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// True when the toggle marked the lesson complete, false when it
    /// un-marked it.
    pub completed: bool,
    pub percentage: u8,
    /// Milestone thresholds crossed upward by this toggle.
    pub crossed: Vec<u8>,
}

/// Per-course learner state. One record per course id, persisted locally by
/// the progress store; never deleted, only overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgress {
    pub course_id: String,
    /// Ids of lessons the learner marked complete.
    pub completed_lessons: BTreeSet<String>,
    /// round(100 * completed / total), recomputed on every toggle.
    pub percentage: u8,
    pub bookmarked: bool,
    /// Star rating 1-5, if the learner rated the course.
    pub rating: Option<u8>,
    /// Graded quiz attempts keyed by lesson id.
    pub quiz_results: HashMap<String, QuizResult>,
    pub updated_at: DateTime<Utc>,
}

impl CourseProgress {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            completed_lessons: BTreeSet::new(),
            percentage: 0,
            bookmarked: false,
            rating: None,
            quiz_results: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    /// Toggle one lesson and recompute the percentage against
    /// `total_lessons`. Returns what changed, including any milestone
    /// thresholds crossed upward.
    pub fn toggle_lesson(&mut self, lesson_id: &str, total_lessons: usize) -> ToggleOutcome {
        let completed = if self.completed_lessons.contains(lesson_id) {
            self.completed_lessons.remove(lesson_id);
            false
        } else {
            self.completed_lessons.insert(lesson_id.to_string());
            true
        };

        let previous = self.percentage;
        self.percentage = rounded_percentage(self.completed_lessons.len(), total_lessons);
        self.updated_at = Utc::now();

        ToggleOutcome {
            completed,
            percentage: self.percentage,
            crossed: milestones_crossed(previous, self.percentage),
        }
    }

    pub fn record_quiz(&mut self, lesson_id: &str, result: QuizResult) {
        self.quiz_results.insert(lesson_id.to_string(), result);
        self.updated_at = Utc::now();
    }

    pub fn reset_quiz(&mut self, lesson_id: &str) -> bool {
        let removed = self.quiz_results.remove(lesson_id).is_some();
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn toggle_bookmark(&mut self) -> bool {
        self.bookmarked = !self.bookmarked;
        self.updated_at = Utc::now();
        self.bookmarked
    }

    pub fn set_rating(&mut self, stars: u8) {
        self.rating = Some(stars.clamp(1, 5));
        self.updated_at = Utc::now();
    }

    /// The certificate view unlocks at full completion.
    pub fn certificate_unlocked(&self) -> bool {
        self.percentage >= 100
    }
}

/// round(100 * completed / total); 0 for an empty course.
pub fn rounded_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Milestone thresholds crossed upward between two percentages. Crossing
/// semantics (previous below, new at-or-above) rather than exact equality,
/// so lesson counts that never land exactly on a quartile still notify.
pub fn milestones_crossed(previous: u8, new: u8) -> Vec<u8> {
    MILESTONES
        .iter()
        .copied()
        .filter(|&threshold| previous < threshold && new >= threshold)
        .collect()
}
