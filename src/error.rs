//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("{0}")]
    InvalidInput(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a failed write: store and internal failures become a 400 with a
    /// generic message, lookup and validation failures pass through.
    ///
    /// ```ignore
    /// handler.execute(command).await.map_err(AppError::write_failure("Failed to create company"))?;
    /// ```
    pub fn write_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
        move |err| match err {
            AppError::Database(ref e) => {
                tracing::warn!(error = %e, "{}", message);
                AppError::InvalidInput(message.to_string())
            }
            AppError::Internal(ref e) => {
                tracing::warn!(error = %e, "{}", message);
                AppError::InvalidInput(message.to_string())
            }
            other => other,
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Domain(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Domain(_) => StatusCode::BAD_REQUEST,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() =>
            {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(sqlx::Error::RowNotFound) => "Not found".to_string(),
            AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                "Resource already exists".to_string()
            }
            AppError::Database(e) if status.is_client_error() => {
                tracing::debug!("Constraint violation: {:?}", e);
                "Invalid reference or value".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Something went wrong".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AmountError;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Domain(DomainError::CompanyNotFound(Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Domain(DomainError::InvalidDate("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_write_failure_hides_store_errors() {
        let wrap = AppError::write_failure("Failed to create company");
        let err = wrap(AppError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Failed to create company"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_write_failure_keeps_domain_errors() {
        let wrap = AppError::write_failure("Failed to add receivable");
        let err = wrap(AppError::Domain(DomainError::CompanyNotFound(Uuid::nil())));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let err = AppError::Domain(DomainError::InvalidAmount(AmountError::InvalidAmount(
            "abc".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid amount: abc");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let response = AppError::Internal("secret connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Something went wrong");
    }
}
