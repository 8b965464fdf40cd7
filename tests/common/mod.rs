use std::sync::Arc;

use courseloom::{
    config::AppConfig,
    create_router,
    AppState, CourseApi, ProgressStore, VideoSearch,
};
use tempfile::TempDir;

/// App state wired for tests: a progress store in a temp directory and a
/// single backend candidate, unroutable by default so course API calls
/// fail fast as disconnected.
pub struct TestApp {
    pub state: AppState,
    // Held so the progress directory outlives the test.
    pub _data_dir: TempDir,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_backend("http://127.0.0.1:1".to_string())
}

/// Like [`setup_test_app`], but pointed at a live (usually mock) backend.
pub fn setup_test_app_with_backend(endpoint: String) -> TestApp {
    let data_dir = TempDir::new().expect("Failed to create temp data dir");

    let mut config = AppConfig::default();
    config.backend.endpoints = vec![endpoint];
    config.backend.request_timeout_secs = 1;
    config.backend.connect_timeout_secs = 1;
    config.storage.data_dir = data_dir.path().to_path_buf();

    let config = Arc::new(config);
    let state = AppState {
        api: CourseApi::new(&config.backend),
        store: ProgressStore::new(config.storage.data_dir.clone())
            .expect("Failed to create progress store"),
        videos: VideoSearch::from_config(&config.video_search),
        config,
    };

    TestApp {
        state,
        _data_dir: data_dir,
    }
}

pub fn test_router(app: &TestApp) -> axum::Router {
    create_router(app.state.clone())
}
