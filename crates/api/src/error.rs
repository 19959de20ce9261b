//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures internal errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order placement or reversal failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Bad request from client (e.g. a body that fails to deserialize).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    const fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Order(OrderError::Database(_)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_internal() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(err) => match err {
                OrderError::InvalidEmail(_)
                | OrderError::EmptyItems
                | OrderError::InvalidQuantity { .. }
                | OrderError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
                OrderError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                // The delete contract reports an unknown order id as 400.
                OrderError::OrderNotFound(_) => StatusCode::BAD_REQUEST,
                OrderError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Order(OrderError::Database(_)) => {
                "Internal server error".to_string()
            }
            Self::Order(err) => match err {
                OrderError::InvalidEmail(_) => "Invalid email".to_string(),
                OrderError::EmptyItems | OrderError::InvalidQuantity { .. } => {
                    "Invalid items entered".to_string()
                }
                OrderError::ItemNotFound(id) => format!("Item #{id} not found"),
                OrderError::InsufficientStock(id) => format!("Not enough stock for item {id}"),
                OrderError::OrderNotFound(id) => format!("Order with id {id} not found"),
                OrderError::Database(_) => "Internal server error".to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use eshop_core::{ItemId, OrderId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_order_error_status_codes() {
        assert_eq!(
            get_status(AppError::Order(OrderError::EmptyItems)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InsufficientStock(
                ItemId::new(1)
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::ItemNotFound(ItemId::new(1)))),
            StatusCode::NOT_FOUND
        );
        // Unknown order id on delete maps to 400, matching the client contract.
        assert_eq!(
            get_status(AppError::Order(OrderError::OrderNotFound(OrderId::new(1)))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AppError::Order(OrderError::Database(sqlx::Error::PoolClosed));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
