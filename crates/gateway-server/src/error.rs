//! HTTP error responses.
//!
//! Wire shapes:
//! - 400: `{"error": "..."}`
//! - 500: `{"error": "Failed to get response from AI service.", "details": "...", "api_error_details": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::GatewayError;
use serde::Serialize;
use serde_json::Value;

/// Top-level message for every 5xx chat failure
pub const SERVICE_FAILURE_MESSAGE: &str = "Failed to get response from AI service.";

/// JSON error body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    /// Short error message
    pub error: String,
    /// Caller-safe details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Raw provider error payload, only when explicitly enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_error_details: Option<Value>,
}

/// API error returned by handlers
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// 400 with a plain message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                details: None,
                api_error_details: None,
            },
        }
    }

    /// Map a gateway error onto the wire.
    ///
    /// `expose_provider_details` controls whether the raw upstream body is
    /// forwarded; leave it off for untrusted callers.
    #[must_use]
    pub fn from_gateway(error: &GatewayError, expose_provider_details: bool) -> Self {
        if error.is_client_error() {
            return Self::bad_request(error.error_message());
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: SERVICE_FAILURE_MESSAGE.to_string(),
                details: Some(error.error_message()),
                api_error_details: if expose_provider_details {
                    error.provider_detail().cloned()
                } else {
                    None
                },
            },
        }
    }

    /// HTTP status
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body
    #[must_use]
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::ProviderKind;
    use serde_json::json;

    #[test]
    fn test_client_error_shape() {
        let err = ApiError::from_gateway(
            &GatewayError::invalid_request("Prompt or image is required."),
            true,
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({"error": "Prompt or image is required."})
        );
    }

    #[test]
    fn test_upstream_error_hides_detail_by_default() {
        let gateway_err = GatewayError::upstream(
            ProviderKind::Gemini,
            "quota exhausted",
            Some(429),
            Some(json!({"error": {"message": "quota exhausted"}})),
        );

        let hidden = ApiError::from_gateway(&gateway_err, false);
        assert_eq!(hidden.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(hidden.body()).unwrap(),
            json!({"error": SERVICE_FAILURE_MESSAGE, "details": "quota exhausted"})
        );

        let exposed = ApiError::from_gateway(&gateway_err, true);
        assert_eq!(
            exposed.body().api_error_details,
            Some(json!({"error": {"message": "quota exhausted"}}))
        );
    }

    #[test]
    fn test_configuration_error_is_generic() {
        let err = ApiError::from_gateway(
            &GatewayError::configuration(ProviderKind::ChatGpt, "OPENAI_API_KEY is not set"),
            true,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let details = err.body().details.clone().unwrap();
        assert!(!details.contains("OPENAI_API_KEY"));
        assert!(err.body().api_error_details.is_none());
    }
}
