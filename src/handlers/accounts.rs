//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /accounts - Open a new account
//! - GET /accounts/{id} - Get account by ID

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    models::account::{AccountResponse, CreateAccountRequest},
    state::AppState,
};

/// Create a new account.
///
/// # Endpoint
///
/// `POST /accounts`
///
/// # Request Body
///
/// ```json
/// {
///   "document_number": "12345678900",
///   "available_credit_limit": 5000.00
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (422)**: Missing document number or negative limit
/// - **Error (500)**: Database error
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    request.validate()?;

    let account = state
        .accounts
        .create(&request.document_number, request.available_credit_limit)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get a specific account by ID.
///
/// # Response
///
/// - **Success (200 OK)**: Returns account details
/// - **Error (404)**: Account not found
/// - **Error (422)**: Id is not positive
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    if account_id < 1 {
        return Err(AppError::InvalidRequest(
            "account id must be positive".to_string(),
        ));
    }

    let account = state.accounts.get(account_id).await?;

    Ok(Json(account.into()))
}
