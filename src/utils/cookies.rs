//! Cookie plumbing for the flash (toast) layer and the theme preference.
//!
//! Flash messages are one-shot: set on a redirect, rendered by the base
//! template on the next page view, and cleared in the same response.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "cl_flash";
pub const THEME_COOKIE: &str = "cl_theme";

/// Severity of a flash notification, controls styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

/// A single toast-style notification carried across one redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Render the Set-Cookie value that plants this flash for the next view.
    pub fn set_cookie(&self) -> String {
        let payload = serde_json::to_string(self).unwrap_or_default();
        format!(
            "{}={}; SameSite=Lax; Path=/; Max-Age=60",
            FLASH_COOKIE,
            cookie_encode(&payload)
        )
    }

    /// Set-Cookie value that removes a consumed flash.
    pub fn clear_cookie() -> String {
        format!("{}=; SameSite=Lax; Path=/; Max-Age=0", FLASH_COOKIE)
    }

    /// Pull a pending flash out of the request headers, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Flash> {
        let raw = cookie_value(headers, FLASH_COOKIE)?;
        serde_json::from_str(&cookie_decode(&raw)).ok()
    }
}

/// UI theme preference, persisted as a long-lived cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Theme {
        match cookie_value(headers, THEME_COOKIE).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; SameSite=Lax; Path=/; Max-Age=31536000",
            THEME_COOKIE,
            self.as_str()
        )
    }
}

/// Extract a single cookie value from the Cookie header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Percent-encode a string so it survives as a cookie value.
fn cookie_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverse of [`cookie_encode`]; invalid escapes pass through untouched.
fn cookie_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&encoded[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
