//! Form and query payloads for the server-rendered pages.

use serde::Deserialize;

/// Optional `?topic=` on the home page, used for the difficulty preview.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub topic: Option<String>,
}

/// Course-generation form on the home and courses pages.
#[derive(Debug, Deserialize)]
pub struct TopicForm {
    pub topic: String,
}

/// `?q=` for the course search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Star-rating form on the course detail page.
#[derive(Debug, Deserialize)]
pub struct RateForm {
    pub stars: u8,
}

/// Contact form. Nothing is stored; the submission is logged and
/// acknowledged.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}
