//! JSON extractor that reports rejections in the API error format

use axum::{
    extract::{rejection::JsonRejection as AxumJsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Wrapper around `axum::Json` whose rejections use the API error body
///
/// Malformed or mistyped bodies are answered with 400 rather than axum's 422,
/// so every unusable customer payload is a plain bad request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// JSON rejection error that returns API error format
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
                code: Some("json_parse_error".to_string()),
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(JsonRejection {
                status: rejection_status(&rejection),
                message: format_rejection_message(&rejection),
            }),
        }
    }
}

fn rejection_status(rejection: &AxumJsonRejection) -> StatusCode {
    match rejection {
        AxumJsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AxumJsonRejection::JsonDataError(_) | AxumJsonRejection::JsonSyntaxError(_) => {
            StatusCode::BAD_REQUEST
        }
        other => other.status(),
    }
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &AxumJsonRejection) -> String {
    use AxumJsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Unsupported or missing Content-Type header. Expected 'application/json' or 'application/xml'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
