//! Error body returned by every customer endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Broad category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

/// `{"error": {...}}` envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    /// Request field the error refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Stable machine-readable reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Handler error carrying its HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Store and cache faults are logged in full and answered with a generic 500
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::error!(
            error = %err,
            component = err.component(),
            "Request failed with an internal error"
        );
        Self::internal("An internal error occurred while processing the request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_with_param_and_code() {
        let err = ApiError::bad_request("Customer ID mismatch")
            .with_param("customerId")
            .with_code("id_mismatch");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.param.as_deref(), Some("customerId"));
        assert_eq!(err.response.error.code.as_deref(), Some("id_mismatch"));
    }

    #[test]
    fn test_storage_fault_hides_details() {
        let api_err: ApiError = DomainError::storage("password authentication failed").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error.error_type, ApiErrorType::ServerError);
        assert!(!api_err.response.error.message.contains("password"));
    }

    #[test]
    fn test_cache_fault_is_internal() {
        let api_err: ApiError = DomainError::cache("evicted mid-read").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_body_shape() {
        let err = ApiError::not_found("Customer 'ZZZZZ' not found");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "not_found_error");
        assert_eq!(json["error"]["message"], "Customer 'ZZZZZ' not found");
        assert!(json["error"].get("param").is_none());
        assert!(json["error"].get("code").is_none());
    }

    #[tokio::test]
    async fn test_into_response_status() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
