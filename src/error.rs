use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// JSON body shared by every endpoint: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// `cause` is logged, only `public` reaches the client.
    #[error("{public}")]
    Internal {
        public: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(public: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            public,
            cause: cause.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal { cause, .. } = &self {
            error!(error = ?cause, "request failed");
        }
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_hides_source() {
        let err = ApiError::internal("Failed to save message", anyhow::anyhow!("pool timed out"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to save message");
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            ApiError::BadRequest("No file uploaded".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("exists".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn message_response_serialization() {
        let json = serde_json::to_string(&MessageResponse::new("ok")).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }
}
