pub mod actions;
pub mod api;
pub mod pages;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::utils::cookies::Flash;

/// 303 redirect carrying a one-shot flash cookie for the next page view.
pub(crate) fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Ok(value) = HeaderValue::from_str(&flash.set_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// 301 for routes that moved for good.
pub(crate) fn moved_permanently(to: &str) -> Response {
    match HeaderValue::from_str(to) {
        Ok(location) => {
            let mut response = StatusCode::MOVED_PERMANENTLY.into_response();
            response.headers_mut().insert(header::LOCATION, location);
            response
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Attach the flash-clearing cookie to a page that consumed one.
pub(crate) fn clear_consumed_flash(mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&Flash::clear_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
