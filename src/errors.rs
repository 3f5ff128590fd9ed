use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no JSON object found in model output")]
    Extraction,

    #[error("invalid JSON in model output: {0}")]
    JsonParse(String),

    #[error("date format not recognized: {0}")]
    DateFormat(String),

    #[error("time format not recognized: {0}")]
    TimeFormat(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("missing required fields: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Extraction => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::JsonParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DateFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TimeFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
