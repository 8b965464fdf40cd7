use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::progress::CourseProgress;

/// File-backed per-course progress store.
///
/// Each course gets one JSON document under the data directory, written
/// whole on every change. Missing or unreadable documents count as "no
/// progress yet" so a wiped data directory never breaks a page.
#[derive(Clone)]
pub struct ProgressStore {
    data_dir: PathBuf,
    // Guards read-modify-write cycles; two toggles for the same course must
    // not interleave between load and save.
    lock: Arc<RwLock<()>>,
}

impl ProgressStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        Ok(Self {
            data_dir,
            lock: Arc::new(RwLock::new(())),
        })
    }

    /// Course ids are UUIDs from the backend, but they arrive via the URL
    /// path; anything outside a conservative character set is stripped
    /// before the id becomes a filename.
    fn path_for(&self, course_id: &str) -> PathBuf {
        let safe: String = course_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();

        self.data_dir.join(format!("{}.json", safe))
    }

    fn read_document(&self, course_id: &str) -> CourseProgress {
        let path = self.path_for(course_id);

        if !path.exists() {
            return CourseProgress::new(course_id);
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(progress) => progress,
                Err(e) => {
                    tracing::warn!("Corrupt progress document {:?}, starting fresh: {}", path, e);
                    CourseProgress::new(course_id)
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read progress document {:?}: {}", path, e);
                CourseProgress::new(course_id)
            }
        }
    }

    fn write_document(&self, progress: &CourseProgress) -> Result<()> {
        let path = self.path_for(&progress.course_id);
        let contents = serde_json::to_string_pretty(progress)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", path))?;

        Ok(())
    }

    /// Progress for one course; the default document when none is stored.
    pub async fn load(&self, course_id: &str) -> CourseProgress {
        let _guard = self.lock.read().await;
        self.read_document(course_id)
    }

    /// Progress for a set of courses, keyed by course id. Courses without a
    /// stored document are omitted.
    pub async fn load_many(&self, course_ids: &[String]) -> HashMap<String, CourseProgress> {
        let _guard = self.lock.read().await;

        course_ids
            .iter()
            .filter(|id| self.path_for(id).exists())
            .map(|id| (id.clone(), self.read_document(id)))
            .collect()
    }

    /// Load, mutate and persist one course's progress atomically, returning
    /// whatever the mutation produced (e.g. milestone crossings).
    pub async fn update<F, T>(&self, course_id: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut CourseProgress) -> T,
    {
        let _guard = self.lock.write().await;

        let mut progress = self.read_document(course_id);
        let outcome = apply(&mut progress);
        progress.updated_at = Utc::now();
        self.write_document(&progress)?;

        Ok(outcome)
    }
}
