use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when the query is empty or missing.
pub const QUERY_REQUIRED: &str = "Query is required.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every response body has the shape `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Injection commands detected.")]
    InjectionDetected,

    #[error("{0}")]
    Llm(String),

    #[error("{0}")]
    Fetch(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InjectionDetected => StatusCode::BAD_REQUEST,
            AppError::Llm(_) | AppError::Fetch(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Fetch(msg) => tracing::error!("Fetch error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Validation(_) | AppError::InjectionDetected => {}
        }

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn detail_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request_with_message() {
        let response = AppError::Validation(QUERY_REQUIRED.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            detail_of(response).await,
            json!({ "detail": "Query is required." })
        );
    }

    #[tokio::test]
    async fn test_injection_maps_to_bad_request() {
        let response = AppError::InjectionDetected.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            detail_of(response).await,
            json!({ "detail": "Injection commands detected." })
        );
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_server_error_with_underlying_message() {
        let response = AppError::Fetch("Error retrieving web content: boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            detail_of(response).await,
            json!({ "detail": "Error retrieving web content: boom" })
        );

        let response = AppError::Internal(anyhow::anyhow!("Some error")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail_of(response).await, json!({ "detail": "Some error" }));
    }

    #[test]
    fn test_llm_error_is_server_error() {
        assert_eq!(
            AppError::Llm("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
