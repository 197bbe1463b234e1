//! HTTP-level errors of the two channels.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prompt_mcp_core::SessionId;
use thiserror::Error;

/// Request rejection. Each variant maps to its own status code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Missing Bearer token")]
    Unauthenticated,
    #[error("Invalid token")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("Unknown sessionId")]
    UnknownSession(SessionId),
    #[error("Session busy")]
    SessionBusy(SessionId),
}

impl GatewayError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
            Self::SessionBusy(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
