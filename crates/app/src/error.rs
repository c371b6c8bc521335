use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use course_core::ValidationError;
use course_storage::CourseStoreError;

pub const COURSE_NOT_FOUND: &str = "The course with the given id was not found.";

/// Failures surfaced by the course endpoints as plain-text responses.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Validation(ValidationError),
    InvalidJson(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text sent back to the caller; validation failures expose only the first violation.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound => COURSE_NOT_FOUND.to_string(),
            Self::Validation(err) => err.first().message(),
            Self::InvalidJson(detail) => detail.clone(),
        }
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation(_) => "invalid",
            Self::InvalidJson(_) => "invalid_json",
        }
    }
}

impl From<CourseStoreError> for ApiError {
    fn from(err: CourseStoreError) -> Self {
        match err {
            CourseStoreError::NotFound(_) => Self::NotFound,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        warn!(stage = "api", status = status.as_u16(), %detail, "request rejected");
        (status, detail).into_response()
    }
}
