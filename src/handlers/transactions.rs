//! Transaction HTTP handlers.
//!
//! - POST /transactions - Record a debit or credit against an account

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    models::transaction::{CreateTransactionRequest, TransactionResponse},
    state::AppState,
};

/// Record a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "account_id": 1,
///   "operation_type_id": 1,
///   "amount": -30.00
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "transaction_id": 10,
///   "account_id": 1,
///   "operation_type_id": 1,
///   "amount": -30.0,
///   "event_date": "2025-12-21T16:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 404: account or operation type not found
/// - 400: negative credit amount, or insufficient credit limit
/// - 422: request failed validation
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    request.validate()?;

    let transaction = state
        .transactions
        .create(request.account_id, request.operation_type_id, request.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}
