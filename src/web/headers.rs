//! Response header post-processing for constrained clients.

use axum::extract::Request;
use axum::http::header::{CACHE_CONTROL, DATE, SERVER};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

pub const STATIC_PREFIX: &str = "/static/";
pub const STYLESHEET_PATH: &str = "/static/style.css";

const STATIC_CACHE: &str = "public, max-age=86400";
const NO_CACHE: &str = "no-cache";

/// Cache static assets for a day, everything else not at all, and drop
/// headers the browser does not need.
pub async fn response_headers(request: Request, next: Next) -> Response {
    let is_static = request.uri().path().starts_with(STATIC_PREFIX);
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    let directive = if is_static { STATIC_CACHE } else { NO_CACHE };
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(directive));
    headers.remove(SERVER);
    headers.remove(DATE);

    response
}
