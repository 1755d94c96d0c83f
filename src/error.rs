//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Which entity a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Account,
    OperationType,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Account => f.write_str("account"),
            Resource::OperationType => f.write_str("operation type"),
        }
    }
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Domain Errors**: `NotFound`, `InvalidAmount`, `InsufficientCreditLimit`.
///   These go back to the caller untouched.
/// - **Store Errors**: `Database` and `DeadlineExceeded`. The detail is logged and
///   the client only sees an opaque failure.
/// - **Consistency Errors**: `CompensationFailed`. The durable credit limit may no
///   longer match the durable transaction history.
/// - **Validation Errors**: Invalid request data rejected at the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced account or operation type does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0} not found")]
    NotFound(Resource),

    /// Negative amount on a credit (replenishment) operation.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid amount")]
    InvalidAmount,

    /// The resulting credit limit would be zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Available credit limit is insufficient")]
    InsufficientCreditLimit,

    /// Restoring the credit limit failed after the transaction row could not be persisted.
    ///
    /// `cause` is the original persist failure. Returns HTTP 500.
    #[error("Failed to restore credit limit of account {account_id}: {compensation}")]
    CompensationFailed {
        account_id: i64,
        compensation: Box<AppError>,
        #[source]
        cause: Box<AppError>,
    },

    /// A store call did not finish before its deadline.
    ///
    /// Returns HTTP 504 Gateway Timeout.
    #[error("Store call exceeded its deadline")]
    DeadlineExceeded,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// Machine-readable code sent in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "internal_error",
            AppError::NotFound(Resource::Account) => "account_not_found",
            AppError::NotFound(Resource::OperationType) => "operation_type_not_found",
            AppError::InvalidAmount => "invalid_amount",
            AppError::InsufficientCreditLimit => "insufficient_credit_limit",
            AppError::CompensationFailed { .. } => "internal_error",
            AppError::DeadlineExceeded => "deadline_exceeded",
            AppError::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidAmount | AppError::InsufficientCreditLimit => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            AppError::Database(_) | AppError::CompensationFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Store failures are logged here with full detail; the body only carries
/// a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "store failure");
                "An internal error occurred".to_string()
            }
            // Already logged at error level by the transaction service
            AppError::CompensationFailed { .. } => "An internal error occurred".to_string(),
            AppError::InvalidRequest(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
