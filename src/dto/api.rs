//! Response types for the portal's own JSON API (consumed by the search
//! box script and documented via OpenAPI).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{course::Course, progress::CourseProgress};
use crate::services::content;

/// One course as rendered in list/search responses, enriched with the
/// derived display attributes and the local progress percentage.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseSummary {
    pub id: String,
    pub topic: String,
    pub description: String,
    pub status: String,
    pub difficulty: String,
    pub icon: String,
    pub lesson_count: usize,
    pub percentage: u8,
    pub bookmarked: bool,
}

impl CourseSummary {
    pub fn from_course(course: &Course, progress: Option<&CourseProgress>) -> Self {
        let lesson_count = if course.has_content() {
            course.total_lessons()
        } else {
            content::outline_lesson_count()
        };

        Self {
            id: course.id.clone(),
            topic: course.topic.clone(),
            description: course.description.clone(),
            status: course.status.as_str().to_string(),
            difficulty: content::classify_difficulty(&course.topic)
                .as_str()
                .to_string(),
            icon: content::topic_icon(&course.topic).to_string(),
            lesson_count,
            percentage: progress.map(|p| p.percentage).unwrap_or(0),
            bookmarked: progress.map(|p| p.bookmarked).unwrap_or(false),
        }
    }

    /// Summaries for a course list, joined with whatever local progress
    /// exists for each course.
    pub fn collect(
        courses: &[Course],
        progress: &HashMap<String, CourseProgress>,
    ) -> Vec<CourseSummary> {
        courses
            .iter()
            .map(|course| Self::from_course(course, progress.get(&course.id)))
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummary>,
    pub total_count: usize,
}

/// Graded quiz attempt as exposed by the progress endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuizResultResponse {
    pub lesson_id: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub course_id: String,
    pub percentage: u8,
    pub completed_lessons: Vec<String>,
    pub bookmarked: bool,
    pub rating: Option<u8>,
    pub quiz_results: Vec<QuizResultResponse>,
}

impl From<CourseProgress> for ProgressResponse {
    fn from(progress: CourseProgress) -> Self {
        let mut quiz_results: Vec<QuizResultResponse> = progress
            .quiz_results
            .iter()
            .map(|(lesson_id, result)| QuizResultResponse {
                lesson_id: lesson_id.clone(),
                score: result.score,
                total: result.total,
                percentage: result.percentage,
            })
            .collect();
        quiz_results.sort_by(|a, b| a.lesson_id.cmp(&b.lesson_id));

        Self {
            course_id: progress.course_id,
            percentage: progress.percentage,
            completed_lessons: progress.completed_lessons.into_iter().collect(),
            bookmarked: progress.bookmarked,
            rating: progress.rating,
            quiz_results,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
