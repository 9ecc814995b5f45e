use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use velina_api_types::{ApiErrorBody, ApiErrorMessage};

use crate::application::error::ErrorReport;
use crate::application::render::RenderError;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
}

/// Client-facing API failure, serialized as
/// `{ "error": { "code", "message" } }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
            detail: None,
        }
    }

    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// Extra diagnostic for the logging middleware; never sent to the caller.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<RenderError> for ApiError {
    fn from(error: RenderError) -> Self {
        Self::bad_request(error.code(), error.message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
            },
        };

        let mut response = (self.status, Json(body)).into_response();
        let detail = self.detail.unwrap_or_else(|| self.message.to_string());
        ErrorReport::from_message("infra::http::api", self.status, detail).attach(&mut response);
        response
    }
}
