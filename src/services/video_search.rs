use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::VideoSearchConfig;
use crate::models::course::VideoRef;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    url: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

/// Optional external video-search client.
///
/// Only constructed when a base URL is configured; without it the detail
/// page keeps the derived placeholder videos. Search failures are logged
/// by the caller and fall back the same way.
#[derive(Clone)]
pub struct VideoSearch {
    client: Arc<Client>,
    base_url: String,
    max_results: usize,
}

impl VideoSearch {
    pub fn from_config(config: &VideoSearchConfig) -> Option<Self> {
        let base_url = config.base_url.as_ref()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Some(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        })
    }

    pub async fn search(&self, topic: &str) -> Result<Vec<VideoRef>> {
        let url = format!("{}/search", self.base_url);
        let limit = self.max_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("q", topic), ("limit", limit.as_str())])
            .send()
            .await
            .with_context(|| format!("Video search request failed for {}", topic))?;

        if !response.status().is_success() {
            anyhow::bail!("Video search returned {}", response.status());
        }

        let results = response
            .json::<SearchResponse>()
            .await
            .with_context(|| "Failed to decode video search response")?;

        let videos = results
            .items
            .into_iter()
            .take(self.max_results)
            .map(|item| VideoRef {
                title: item.title,
                thumbnail_url: item.thumbnail.unwrap_or_default(),
                duration: item.duration.unwrap_or_default(),
                channel: item.channel.unwrap_or_default(),
                url: item.url,
            })
            .collect();

        Ok(videos)
    }
}
