use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightinfo_core::FlightInfoError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    /// Already logged and sanitized by the service.
    Service(FlightInfoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Service(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<FlightInfoError> for AppError {
    fn from(err: FlightInfoError) -> Self {
        Self::Service(err)
    }
}
