//! Request and response bodies

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finguard_core::api::{Identity, PipelineError};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/ask`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub context: Identity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub session_id: String,
    pub uptime_seconds: f64,
    pub decision_backend: String,
    pub degraded: bool,
    pub generator: String,
    pub requests_total: u64,
    pub answered_total: u64,
    pub denied_total: u64,
    pub errors_total: u64,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl HttpServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            HttpServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            HttpServerError::Pipeline(PipelineError::Security(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SECURITY_CHECK_FAILED")
            }
            HttpServerError::Pipeline(PipelineError::Generation(_)) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
            }
        }
    }

    /// Message including the source chain, without internal detail beyond it.
    fn message(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(s) = source {
            msg.push_str(": ");
            msg.push_str(&s.to_string());
            source = s.source();
        }
        msg
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            success: false,
            error: self.message(),
            error_code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
