//! Wire shapes for the course-generation backend.
//!
//! The backend is loose about envelopes: lists come as
//! `{ success, courses }`, single courses sometimes as `{ success, course }`
//! and sometimes as a bare course object. Everything is normalized here, at
//! the client boundary, so the rest of the app only ever sees [`Course`].

use serde::{Deserialize, Serialize};

use crate::models::course::Course;

/// Request body for `POST /api/courses/`.
#[derive(Debug, Serialize)]
pub struct CreateCoursePayload {
    pub topic: String,
    pub created_by: String,
}

/// Envelope for `GET /api/courses/` and `GET /api/search-courses/`.
#[derive(Debug, Deserialize)]
pub struct CourseListEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl CourseListEnvelope {
    /// A missing `success` field counts as success; only an explicit
    /// `false` is a backend-reported failure.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Envelope for endpoints that return one course, nested or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CourseEnvelope {
    Wrapped {
        #[serde(default)]
        success: Option<bool>,
        course: Course,
    },
    Flat(Course),
}

impl CourseEnvelope {
    pub fn into_course(self) -> Option<Course> {
        match self {
            CourseEnvelope::Wrapped { success, course } => {
                if success.unwrap_or(true) {
                    Some(course)
                } else {
                    None
                }
            }
            CourseEnvelope::Flat(course) => Some(course),
        }
    }
}

/// Envelope for `GET /api/courses/stats/`.
#[derive(Debug, Deserialize)]
pub struct StatsEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub total_courses: Option<u64>,
}

/// Normalized catalog statistics. Loading is best-effort; callers fall back
/// to the default when the backend is unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogStats {
    pub total_courses: u64,
}

impl From<StatsEnvelope> for CatalogStats {
    fn from(envelope: StatsEnvelope) -> Self {
        CatalogStats {
            total_courses: envelope.total_courses.unwrap_or(0),
        }
    }
}
