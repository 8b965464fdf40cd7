use std::path::PathBuf;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application configuration structure
///
/// Features:
/// - AppConfig
/// - BackendConfig (candidate endpoints for the course-generation API)
/// - StorageConfig (local progress store)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub video_search: VideoSearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub debug: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Course-generation backend configuration
///
/// `endpoints` is an ordered candidate list; the API client probes each
/// candidate's health path in turn and sticks with the first one that
/// answers 2xx.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub endpoints: Vec<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

/// Local progress store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Optional external video-search API. When `base_url` is unset the course
/// detail page falls back to the derived placeholder videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearchConfig {
    pub base_url: Option<String>,
    pub max_results: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "courseloom".to_string(),
                version: "1.0.0".to_string(),
                debug: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            backend: BackendConfig {
                endpoints: vec![
                    "https://api.courseloom.dev".to_string(),
                    "http://localhost:8000".to_string(),
                ],
                request_timeout_secs: 30,
                connect_timeout_secs: 5,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
            video_search: VideoSearchConfig {
                base_url: None,
                max_results: 4,
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        info!("Loading application configuration...");

        let config: AppConfig = Figment::new()
            // Start with default values
            .merge(Serialized::defaults(Self::default()))
            // Override with config file if present
            .merge(Yaml::file("config.yaml"))
            // Override with environment variables
            .merge(Env::prefixed("APP_").split("_"))
            .extract()?;

        info!("Configuration loaded successfully");
        info!("name: {:?}", config.app.name);
        info!("Backend candidates: {:?}", config.backend.endpoints);
        info!("Progress store: {}", config.storage.data_dir.display());

        Ok(config)
    }
}
