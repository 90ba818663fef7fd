use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Every failure the gateway reports to a caller. Each kind keeps its own
/// message so a caller can tell a missing field from a dead upstream from
/// an upstream that rejected the API key.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed(String),

    #[error("Missing required field: url")]
    MissingTargetUrl,

    #[error("Invalid request")]
    InvalidRequest(String),

    #[error("PageSpeed API key is not configured")]
    MissingApiKey,

    #[error("Upstream request failed")]
    UpstreamTransport(String),

    #[error("Upstream response is not valid JSON")]
    UpstreamParse(String),

    #[error("Upstream API reported an error")]
    UpstreamRejected(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::MissingTargetUrl | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::MissingApiKey
            | GatewayError::UpstreamTransport(_)
            | GatewayError::UpstreamParse(_)
            | GatewayError::UpstreamRejected(_)
            | GatewayError::UpstreamTimeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            GatewayError::MethodNotAllowed(method) => {
                Some(format!("{method} is not supported here; use POST"))
            }
            GatewayError::MissingTargetUrl => None,
            GatewayError::MissingApiKey => {
                Some("set PAGESPEED_API_KEY or pass --api-key".to_string())
            }
            GatewayError::InvalidRequest(details)
            | GatewayError::UpstreamTransport(details)
            | GatewayError::UpstreamParse(details)
            | GatewayError::UpstreamRejected(details)
            | GatewayError::UpstreamTimeout(details) => Some(details.clone()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = serde_json::json!({
            "error": self.to_string(),
            "details": self.details(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_statuses() {
        assert_eq!(
            GatewayError::MissingTargetUrl.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::InvalidRequest("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_method_not_allowed_status() {
        assert_eq!(
            GatewayError::MethodNotAllowed("DELETE".into()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_server_side_failures_are_500() {
        let errors = [
            GatewayError::MissingApiKey,
            GatewayError::UpstreamTransport("status 503".into()),
            GatewayError::UpstreamParse("expected value".into()),
            GatewayError::UpstreamRejected("API key not valid".into()),
            GatewayError::UpstreamTimeout("deadline elapsed".into()),
        ];
        for error in errors {
            assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_failure_kinds_have_distinct_messages() {
        let messages = [
            GatewayError::UpstreamTransport("x".into()).to_string(),
            GatewayError::UpstreamParse("x".into()).to_string(),
            GatewayError::UpstreamRejected("x".into()).to_string(),
            GatewayError::UpstreamTimeout("x".into()).to_string(),
            GatewayError::MissingApiKey.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_details_carry_the_cause() {
        let error = GatewayError::UpstreamParse("expected value at line 1: <html>".into());
        assert!(error.details().unwrap().contains("<html>"));
    }
}
