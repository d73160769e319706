use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::{error, warn};

/// Failure of one dispatched call, rendered as `{error: message}`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self(e) }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Duplicate => StatusCode::CONFLICT,
            ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.0.to_string();
        if status.is_server_error() {
            error!(error = %msg, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %msg, status = status.as_u16(), "request rejected");
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        assert_eq!(ApiError(ServiceError::MissingField("name")).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(ServiceError::InvalidDateFormat("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(ServiceError::not_found("device X")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError(ServiceError::DuplicateDevice("X".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError(ServiceError::Db("boom".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError(ServiceError::Timeout(std::time::Duration::from_secs(30))).status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
