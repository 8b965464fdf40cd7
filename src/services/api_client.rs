use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::dto::course::{
    CatalogStats, CourseEnvelope, CourseListEnvelope, CreateCoursePayload, StatsEnvelope,
};
use crate::models::course::Course;

/// Per-candidate budget while hunting for a live endpoint. Kept short so a
/// dead first candidate does not stall page loads for the full request
/// timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors surfaced by the course backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no reachable course backend")]
    Disconnected,
    #[error("course not found")]
    NotFound,
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend returned status {0}")]
    Backend(StatusCode),
    #[error("failed to decode backend response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("request to backend failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ApiError {
    /// Short, user-safe phrasing for flash messages.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Disconnected | ApiError::Transport(_) => {
                "The course service is unreachable right now. Please try again in a moment."
            }
            ApiError::NotFound => "That course could not be found.",
            ApiError::Rejected(_) => "The course service could not handle that request.",
            ApiError::Backend(_) | ApiError::Decode(_) => {
                "The course service returned an unexpected response."
            }
        }
    }
}

/// HTTP client for the course-generation backend.
///
/// Holds an ordered candidate endpoint list. The first request probes each
/// candidate's `/health/` route and caches the first one answering 2xx;
/// later requests reuse the cached endpoint, and any transport failure
/// against it drops the cache so the next call probes again.
#[derive(Clone)]
pub struct CourseApi {
    client: Arc<Client>,
    candidates: Arc<Vec<String>>,
    active: Arc<RwLock<Option<String>>>,
}

impl CourseApi {
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        let candidates = config
            .endpoints
            .iter()
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .collect();

        Self {
            client: Arc::new(client),
            candidates: Arc::new(candidates),
            active: Arc::new(RwLock::new(None)),
        }
    }

    /// The endpoint currently in use, if any probe has succeeded yet.
    pub async fn active_endpoint(&self) -> Option<String> {
        self.active.read().await.clone()
    }

    /// Probe candidates in order and cache the first healthy one.
    async fn resolve_endpoint(&self) -> Result<String, ApiError> {
        if let Some(base) = self.active.read().await.clone() {
            return Ok(base);
        }

        let mut active = self.active.write().await;
        // Another request may have finished probing while we waited.
        if let Some(base) = active.as_ref() {
            return Ok(base.clone());
        }

        for candidate in self.candidates.iter() {
            let url = format!("{}/health/", candidate);
            match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!("Course backend selected: {}", candidate);
                    *active = Some(candidate.clone());
                    return Ok(candidate.clone());
                }
                Ok(response) => {
                    tracing::warn!(
                        "Backend candidate {} unhealthy: {}",
                        candidate,
                        response.status()
                    );
                }
                Err(e) => {
                    tracing::warn!("Backend candidate {} unreachable: {}", candidate, e);
                }
            }
        }

        tracing::error!("All {} backend candidates failed health probes", self.candidates.len());
        Err(ApiError::Disconnected)
    }

    /// Forget the cached endpoint after a transport failure so the next
    /// request probes the candidate list again.
    async fn invalidate_endpoint(&self) {
        let mut active = self.active.write().await;
        if let Some(base) = active.take() {
            tracing::warn!("Dropping cached backend endpoint {}", base);
        }
    }

    async fn transport_error(&self, e: reqwest::Error) -> ApiError {
        tracing::error!("Backend request failed: {}", e);
        self.invalidate_endpoint().await;
        ApiError::Transport(e)
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let base = self.resolve_endpoint().await?;
        let url = format!("{}/api/courses/", base);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(e).await),
        };

        if !response.status().is_success() {
            tracing::error!("Course listing failed: {}", response.status());
            return Err(ApiError::Backend(response.status()));
        }

        let envelope = response
            .json::<CourseListEnvelope>()
            .await
            .map_err(ApiError::Decode)?;

        if !envelope.is_success() {
            return Err(ApiError::Rejected("backend reported a failed listing".to_string()));
        }

        tracing::debug!("Fetched {} courses from backend", envelope.courses.len());
        Ok(envelope.courses)
    }

    /// Free-text course search, delegated to the backend.
    pub async fn search_courses(&self, query: &str) -> Result<Vec<Course>, ApiError> {
        let base = self.resolve_endpoint().await?;
        let url = format!("{}/api/search-courses/", base);

        let response = match self.client.get(&url).query(&[("q", query)]).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(e).await),
        };

        if !response.status().is_success() {
            tracing::error!("Course search failed: {}", response.status());
            return Err(ApiError::Backend(response.status()));
        }

        let envelope = response
            .json::<CourseListEnvelope>()
            .await
            .map_err(ApiError::Decode)?;

        if !envelope.is_success() {
            return Err(ApiError::Rejected("backend reported a failed search".to_string()));
        }

        Ok(envelope.courses)
    }

    pub async fn create_course(&self, topic: &str, created_by: &str) -> Result<Course, ApiError> {
        let base = self.resolve_endpoint().await?;
        let url = format!("{}/api/courses/", base);
        let payload = CreateCoursePayload {
            topic: topic.to_string(),
            created_by: created_by.to_string(),
        };

        tracing::info!("Requesting course generation for topic: {}", topic);

        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(e).await),
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Course creation failed: {} - {}", status, error_text);
            return Err(ApiError::Backend(status));
        }

        let envelope = response
            .json::<CourseEnvelope>()
            .await
            .map_err(ApiError::Decode)?;

        envelope
            .into_course()
            .ok_or_else(|| ApiError::Rejected("backend reported a failed creation".to_string()))
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Course, ApiError> {
        // Backend ids are UUIDs in practice; a malformed id is still
        // forwarded (the backend answers 404) but worth noting.
        if Uuid::parse_str(course_id).is_err() {
            tracing::warn!("Course id is not a UUID: {}", course_id);
        }

        let base = self.resolve_endpoint().await?;
        let url = format!("{}/api/courses/{}/", base, course_id);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(e).await),
        };

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !response.status().is_success() {
            tracing::error!("Course fetch failed for {}: {}", course_id, response.status());
            return Err(ApiError::Backend(response.status()));
        }

        let envelope = response
            .json::<CourseEnvelope>()
            .await
            .map_err(ApiError::Decode)?;

        envelope
            .into_course()
            .ok_or(ApiError::NotFound)
    }

    /// Catalog totals for the home page. Callers treat failures as "stats
    /// unavailable" rather than an error page.
    pub async fn stats(&self) -> Result<CatalogStats, ApiError> {
        let base = self.resolve_endpoint().await?;
        let url = format!("{}/api/courses/stats/", base);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(e).await),
        };

        if !response.status().is_success() {
            return Err(ApiError::Backend(response.status()));
        }

        let envelope = response
            .json::<StatsEnvelope>()
            .await
            .map_err(ApiError::Decode)?;

        Ok(CatalogStats::from(envelope))
    }
}
