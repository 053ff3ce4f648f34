use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::error::ChatError;

use super::templates;

/// Handler failure. Rendered as the landing page with a 500 status.
#[derive(Debug)]
pub struct AppError(pub ChatError);

impl<E> From<E> for AppError
where
    E: Into<ChatError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, category = ?self.0.category(), "Request failed");
        let body = templates::render_index()
            .unwrap_or_else(|_| "Internal Server Error".to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
