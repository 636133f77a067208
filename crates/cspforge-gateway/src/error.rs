//! Gateway error surface and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use cspforge_core::CspError;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Csp(#[from] CspError),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn client_code(&self) -> &'static str {
        match self {
            GatewayError::Csp(e) => e.kind().as_str(),
            GatewayError::InvalidHeader(_) => "INVALID_HEADER",
            GatewayError::Io(_) => "INTERNAL",
        }
    }
}

// A policy that fails to compile is a server-side fault: the response is
// replaced with a 500 and no CSP header is emitted.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.client_code(),
            "message": self.to_string(),
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
