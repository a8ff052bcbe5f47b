//! HTTP error mapping
//!
//! Every failure leaving a handler passes through [`ApiError`], the one place
//! that picks status codes and shapes error bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use stores_core::{AuthError, ServiceError};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Body that could not be read as JSON of the expected shape
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(e) => match e {
                ServiceError::NotFound { .. } | ServiceError::LinkNotFound => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::DuplicateName { entity: "user" } => StatusCode::CONFLICT,
                ServiceError::DuplicateName { .. }
                | ServiceError::TagInUse
                | ServiceError::CrossStoreLink => StatusCode::BAD_REQUEST,
                ServiceError::Unauthorized(_) | ServiceError::InvalidCredentials => {
                    StatusCode::UNAUTHORIZED
                }
                ServiceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Storage(_) | ServiceError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Auth(e) if e.is_client_error() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({
            "code": status.as_u16(),
            "status": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });

        match &self {
            ApiError::Service(ServiceError::InvalidInput(errors)) => {
                body["message"] = Value::from("Validation failed");
                body["errors"] = json!(errors);
            }
            ApiError::Auth(e) => {
                body["error"] = Value::from(e.code());
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stores_core::FieldErrors;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    async fn body_of(err: impl Into<ApiError>) -> Value {
        let response = err.into().into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_service_status_codes() {
        assert_eq!(
            status_of(ServiceError::not_found("Store", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::duplicate("store")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::duplicate("user")),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ServiceError::TagInUse), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ServiceError::CrossStoreLink),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ServiceError::LinkNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ServiceError::Unauthorized("no".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(status_of(AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenRevoked), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::Storage("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_detail_not_exposed() {
        let body = body_of(ServiceError::Storage("secret table".into())).await;
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_token_errors_carry_code() {
        let body = body_of(AuthError::TokenRevoked).await;
        assert_eq!(body["code"], 401);
        assert_eq!(body["status"], "Unauthorized");
        assert_eq!(body["error"], "token_revoked");
    }

    #[tokio::test]
    async fn test_validation_errors_listed() {
        let body = body_of(ServiceError::InvalidInput(FieldErrors::single(
            "name",
            "Missing data for required field.",
        )))
        .await;
        assert_eq!(body["code"], 422);
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(
            body["errors"][0]["message"],
            "Missing data for required field."
        );
    }
}
