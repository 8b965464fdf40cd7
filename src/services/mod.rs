pub mod api_client;
pub mod content;
pub mod progress;
pub mod video_search;
