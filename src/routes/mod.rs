pub mod analyze;
pub mod status;

use axum::http::{Method, StatusCode};

use crate::error::GatewayError;

/// Empty 200 for CORS preflight; the CORS layer attaches the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Method-router fallback: anything that is not GET/POST/OPTIONS gets a
/// structured 405 body instead of axum's bare default.
pub async fn method_not_allowed(method: Method) -> GatewayError {
    GatewayError::MethodNotAllowed(method.to_string())
}
