//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a transaction
//! - `CreateTransactionRequest`: Request body for recording a transaction
//! - `TransactionResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Rows are append-only: each one is written
/// exactly once by a successful workflow run and never updated or deleted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Transaction {
    /// Store-assigned identifier
    pub id: i64,

    /// Account whose credit limit this transaction changed
    pub account_id: i64,

    /// Category of the transaction
    pub operation_type_id: i64,

    /// Amount exactly as supplied by the caller, sign included
    ///
    /// Debit amounts may arrive with either sign; only the magnitude is applied
    /// to the credit limit, but the original value is what gets recorded.
    pub amount: Decimal,

    /// Server-assigned creation timestamp
    pub event_date: DateTime<Utc>,
}

/// Request to record a transaction against an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": 1,
///   "operation_type_id": 1,
///   "amount": -30.00
/// }
/// ```
///
/// # Validation
///
/// - `account_id` and `operation_type_id` must be positive
/// - `amount` must be non-zero
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub account_id: i64,
    pub operation_type_id: i64,
    pub amount: Decimal,
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.account_id < 1 {
            return Err(AppError::InvalidRequest(
                "account_id must be positive".to_string(),
            ));
        }

        if self.operation_type_id < 1 {
            return Err(AppError::InvalidRequest(
                "operation_type_id must be positive".to_string(),
            ));
        }

        if self.amount.is_zero() {
            return Err(AppError::InvalidRequest("amount is required".to_string()));
        }

        Ok(())
    }
}

/// Response returned for transaction operations.
///
/// # JSON Example
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
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: i64,
    pub account_id: i64,
    pub operation_type_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            transaction_id: transaction.id,
            account_id: transaction.account_id,
            operation_type_id: transaction.operation_type_id,
            amount: transaction.amount,
            event_date: transaction.event_date,
        }
    }
}
