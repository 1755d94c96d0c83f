//! Operation type model.
//!
//! Operation types are seeded by migration and never created at runtime.
//! The only thing the transaction workflow derives from them is the category.

use serde::Serialize;

/// Id of the one operation type that replenishes the credit limit.
pub const CREDIT_OPERATION_TYPE_ID: i64 = 4;

/// Seed rows, mirrored by the `operation_types` migration.
pub const DEFAULT_OPERATION_TYPES: [(i64, &str); 4] = [
    (1, "Cash purchase"),
    (2, "Installment purchase"),
    (3, "Withdrawal"),
    (CREDIT_OPERATION_TYPE_ID, "Payment"),
];

/// Direction in which an operation moves the credit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationCategory {
    /// Consumes credit: the amount's magnitude is subtracted.
    Debit,
    /// Replenishes credit: a non-negative amount is added.
    Credit,
}

impl OperationCategory {
    pub fn of(operation_type_id: i64) -> Self {
        if operation_type_id == CREDIT_OPERATION_TYPE_ID {
            OperationCategory::Credit
        } else {
            OperationCategory::Debit
        }
    }
}

/// Represents a row of the `operation_types` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct OperationType {
    pub id: i64,
    pub description: String,
}

impl OperationType {
    pub fn category(&self) -> OperationCategory {
        OperationCategory::of(self.id)
    }
}
