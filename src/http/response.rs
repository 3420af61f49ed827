//! Error responses.
//!
//! Owns the mapping from orchestrator errors to HTTP statuses: an open
//! circuit is a 503 distinguishable from an actual upstream failure, a
//! lookup miss surfaces as 404, exhausted retries as 502.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::resilience::CallError;

/// Wrapper turning a [`CallError`] into a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub CallError);

impl From<CallError> for ApiError {
    fn from(err: CallError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CallError::CircuitOpen(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "External service temporarily unavailable. Try again later.",
            ),
            CallError::Permanent(fault) if fault.is_not_found() => (
                StatusCode::NOT_FOUND,
                "Asset not found in the external service.",
            ),
            CallError::Permanent(_) => (
                StatusCode::BAD_REQUEST,
                "Error integrating with the external service.",
            ),
            CallError::RetriesExhausted { .. } => (
                StatusCode::BAD_GATEWAY,
                "External service failed after retries.",
            ),
            CallError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error communicating with the external service.",
            ),
        };

        let body = Json(json!({
            "message": message,
            "detail": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::{CircuitOpenError, Fault};

    fn status_for(err: CallError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn maps_call_errors_to_statuses() {
        assert_eq!(
            status_for(CallError::CircuitOpen(CircuitOpenError {
                service: "market_data".into()
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(CallError::Permanent(Fault::Status(404))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(CallError::Permanent(Fault::Status(400))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(CallError::RetriesExhausted {
                attempts: 3,
                source: Fault::Timeout
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(CallError::Unexpected(Fault::Unexpected("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
