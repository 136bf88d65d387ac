use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Ratings artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Ratings artifact is corrupt: {0}")]
    ArtifactCorrupt(String),

    #[error("Unknown title: {0}")]
    UnknownTitle(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable name of the error, sent alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ArtifactNotFound(_) => "artifact_not_found",
            AppError::ArtifactCorrupt(_) => "artifact_corrupt",
            AppError::UnknownTitle(_) => "unknown_title",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Internal(_) => "internal",
        }
    }

    /// True for errors raised while loading the catalog, as opposed to per-query errors
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            AppError::ArtifactNotFound(_) | AppError::ArtifactCorrupt(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownTitle(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ArtifactNotFound(_) | AppError::ArtifactCorrupt(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

// Extractor rejections carry axum's plain-text body; surface them as JSON instead

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_title_maps_to_not_found() {
        let response = AppError::UnknownTitle("Nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response = AppError::InvalidInput("k too large".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_load_errors_are_distinguishable() {
        assert!(AppError::ArtifactNotFound("a.bin".to_string()).is_load_error());
        assert!(AppError::ArtifactCorrupt("ragged".to_string()).is_load_error());
        assert!(!AppError::UnknownTitle("x".to_string()).is_load_error());
        assert_ne!(
            AppError::ArtifactNotFound(String::new()).kind(),
            AppError::UnknownTitle(String::new()).kind()
        );
    }
}
