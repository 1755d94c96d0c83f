//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `AccountResponse`: Response body returned to clients

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table.
///
/// # Credit Limit
///
/// `available_credit_limit` is stored as `NUMERIC` and mapped to `Decimal`, so
/// debits and credits are applied without floating-point drift. After creation it
/// only changes through `AccountService::update_credit_limit`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Account {
    /// Store-assigned identifier (always positive)
    pub id: i64,

    /// Opaque document identifier of the account holder, immutable after creation
    pub document_number: String,

    /// Credit still available to this account
    pub available_credit_limit: Decimal,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "document_number": "12345678900",
///   "available_credit_limit": 5000.00
/// }
/// ```
///
/// # Validation
///
/// - `document_number`: Required, non-blank
/// - `available_credit_limit`: Optional, defaults to 0, must not be negative
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub document_number: String,

    #[serde(default)]
    pub available_credit_limit: Decimal,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.document_number.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "document_number is required".to_string(),
            ));
        }

        if self.available_credit_limit < Decimal::ZERO {
            return Err(AppError::InvalidRequest(
                "available_credit_limit must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": 1,
///   "document_number": "12345678900",
///   "available_credit_limit": 5000.0
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account_id: i64,
    pub document_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub available_credit_limit: Decimal,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            document_number: account.document_number,
            available_credit_limit: account.available_credit_limit,
        }
    }
}
