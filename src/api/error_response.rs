//! Response envelope and HTTP error conversion
//!
//! Every response body has the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "meta": { "timestamp": "..." } }
//! { "success": false, "error": { "message": "...", "code": "..." }, "meta": { "timestamp": "..." } }
//! ```
//!
//! Handlers return [`ApiResponse`] on success and [`Error`] on failure; both
//! implement [`IntoResponse`] and produce the envelope.

use crate::error::{ApiError, Error, ToHttpStatus};
use crate::types::now_rfc3339;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Envelope as serialized on the wire
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
    meta: Map<String, Value>,
}

fn meta_with(extra: Map<String, Value>) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("timestamp".to_string(), Value::String(now_rfc3339()));
    meta.extend(extra);
    meta
}

/// Successful response carrying `data` and optional extra metadata
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
    meta: Map<String, Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with `data`
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
            meta: Map::new(),
        }
    }

    /// Override the status code
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a metadata field next to `timestamp`
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            data: Some(self.data),
            error: None,
            meta: meta_with(self.meta),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failure envelope with an explicit status and extra metadata
pub fn error_response(
    status: StatusCode,
    error: ApiError,
    meta: Map<String, Value>,
) -> Response {
    let body: Envelope<()> = Envelope {
        success: false,
        data: None,
        error: Some(error),
        meta: meta_with(meta),
    };
    (status, Json(body)).into_response()
}

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Request rejected");
        }

        error_response(status_code, self.into(), Map::new())
    }
}

/// Malformed or mistyped JSON bodies are validation failures
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}
