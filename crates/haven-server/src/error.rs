//! HTTP error responses.
//!
//! Every failure leaves the server as a JSON envelope with `success: false`
//! and a flat `error` string. Internal details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use haven_core::Error;
use serde_json::json;

/// Result alias for handler functions.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// An error that renders as the standard JSON envelope.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with the given error string.
    BadRequest {
        /// Flat error message returned to the client.
        message: String,
    },
    /// 405 for a route hit with an unsupported method.
    MethodNotAllowed,
    /// 429 with the standard "too many submissions" body.
    RateLimited {
        /// Seconds the client should wait before retrying.
        retry_after: u64,
    },
    /// 500 with a generic message; the cause is logged at the call site.
    Internal,
    /// Error with a custom JSON body, used for action-catalog hints.
    WithBody {
        /// HTTP status code.
        status: StatusCode,
        /// Full response body; must already contain the error string.
        body: serde_json::Value,
    },
}

impl ApiError {
    /// Creates a 400 response with the given message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a 400 response with a caller-supplied body.
    #[must_use]
    pub fn with_body(body: serde_json::Value) -> Self {
        Self::WithBody {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingFields { .. } | Error::Validation { .. } => Self::BadRequest {
                message: err.to_string(),
            },
            Error::RateLimited { retry_after } => Self::RateLimited {
                retry_after: retry_after.as_secs(),
            },
            other => {
                tracing::error!(error = %other, "Request failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": message }),
            ),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "success": false, "error": "Method not allowed" }),
            ),
            Self::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "success": false,
                    "error": "Too many submissions",
                    "message": "Please wait 10 minutes before submitting another form. \
                                For urgent inquiries, call our office.",
                    "retryAfter": retry_after,
                }),
            ),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "Internal server error" }),
            ),
            Self::WithBody { status, body } => (status, body),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_maps_to_bad_request() {
        let core = Error::MissingFields {
            fields: vec!["firstName".to_string(), "email".to_string()],
        };
        match ApiError::from(core) {
            ApiError::BadRequest { message } => {
                assert_eq!(message, "Missing required fields: firstName, email");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limited_carries_seconds() {
        let core = Error::RateLimited {
            retry_after: std::time::Duration::from_secs(600),
        };
        match ApiError::from(core) {
            ApiError::RateLimited { retry_after } => assert_eq!(retry_after, 600),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("nope").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::RateLimited { retry_after: 600 }
                .into_response()
                .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
