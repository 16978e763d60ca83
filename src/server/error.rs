use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::error::AlertsError;

/// JSON:API error document: `{"errors":[{"status":404,"detail":"..."}]}`.
#[derive(Serialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

#[derive(Serialize)]
struct ErrorObject {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The SQL service failed or answered with something unusable.
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::BadGateway(m) => (StatusCode::BAD_GATEWAY, m),
            Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Request failed");
        }

        (
            status,
            Json(ErrorDocument {
                errors: vec![ErrorObject {
                    status: status.as_u16(),
                    detail,
                }],
            }),
        )
            .into_response()
    }
}

impl From<AlertsError> for ApiError {
    fn from(err: AlertsError) -> Self {
        match err {
            AlertsError::InvalidInput(m) => Self::BadRequest(m),
            AlertsError::NotFound(m) => Self::NotFound(m),
            e @ AlertsError::Remote(_) => Self::BadGateway(e.to_string()),
            e @ AlertsError::Render(_) => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_document() {
        let resp = ApiError::from(AlertsError::not_found("Geostore not found")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body(resp).await;
        assert_eq!(json["errors"][0]["status"], 404);
        assert_eq!(json["errors"][0]["detail"], "Geostore not found");
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let resp = ApiError::from(AlertsError::invalid("Name param invalid")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remote_is_bad_gateway() {
        let err = AlertsError::Remote(anyhow::anyhow!("timeout"));
        let resp = ApiError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body(resp).await;
        assert!(json["errors"][0]["detail"].as_str().unwrap().contains("timeout"));
    }
}
