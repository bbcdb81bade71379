use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Upstream data error: {0}")]
    Upstream(String),

    #[error("Authorization error: {0}")]
    Authorization(String),
}

impl From<sqlx::Error> for InsightError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            other => Self::Upstream(format!("Database error: {}", other)),
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Upstream(format!("JSON error: {}", err))
    }
}

// A failed query must surface as an error response, never as an empty
// section the UI cannot tell apart from "zero results".
impl IntoResponse for InsightError {
    fn into_response(self) -> Response {
        let status = match &self {
            InsightError::NotFound(_) => StatusCode::NOT_FOUND,
            InsightError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            InsightError::Authorization(_) => StatusCode::FORBIDDEN,
            InsightError::Upstream(_) | InsightError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
