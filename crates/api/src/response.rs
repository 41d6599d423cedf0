//! API response envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use microblog_common::AppError;
use serde::Serialize;

/// Uniform response envelope.
///
/// Always sent with HTTP 200; `result` tells success from failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the operation succeeded.
    pub result: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error kind on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    /// Error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            result: true,
            data: Some(data),
            error_type: None,
            error_message: None,
        }
    }

    /// Create a failure response.
    pub fn fail(error_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            result: false,
            data: None,
            error_type: Some(error_type),
            error_message: Some(message.into()),
        }
    }

    /// Create a failure response from a service error.
    pub fn from_error(error_type: &'static str, err: &AppError) -> Self {
        Self::fail(error_type, err.message())
    }
}

impl ApiResponse<()> {
    /// Create a success response without data.
    #[must_use]
    pub const fn ok_empty() -> Self {
        Self {
            result: true,
            data: None,
            error_type: None,
            error_message: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
