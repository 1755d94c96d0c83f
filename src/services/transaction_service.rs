//! Transaction service - Core business logic for recording transactions.
//!
//! This service handles:
//! - Account and operation type validation
//! - Credit limit computation under the signed/unsigned amount convention
//! - The positive-limit invariant
//! - Persisting the transaction row, with compensation on failure
//!
//! # Consistency Modes
//!
//! By default the workflow is a two-step saga: the limit is written first, then
//! the transaction row, and a failed insert is answered by restoring the previous
//! limit. Nothing isolates two concurrent runs against the same account, so one
//! can overwrite the other's limit.
//!
//! With an `AtomicLedger` attached, the same rules run inside a single storage
//! transaction that locks the account row, and no compensation is needed.

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{
        account::Account,
        operation_type::{OperationCategory, OperationType},
        transaction::Transaction,
    },
    services::{AccountService, OperationTypeService, with_deadline},
    stores::{AtomicLedger, LimitPlan, TransactionStore},
};

/// Compute the credit limit that results from applying `amount` to `account`.
///
/// - Credit: a negative amount is rejected, otherwise it is added.
/// - Debit: the magnitude is subtracted regardless of sign.
///
/// A credit that would overflow the limit is rejected as an invalid amount.
/// A resulting limit of zero or below is rejected.
pub fn next_credit_limit(
    account: &Account,
    operation_type: &OperationType,
    amount: Decimal,
) -> Result<Decimal, AppError> {
    let new_limit = match operation_type.category() {
        OperationCategory::Credit => {
            if amount < Decimal::ZERO {
                return Err(AppError::InvalidAmount);
            }
            account
                .available_credit_limit
                .checked_add(amount)
                .ok_or(AppError::InvalidAmount)?
        }
        // Overflow here means the result is far below zero
        OperationCategory::Debit => account
            .available_credit_limit
            .checked_sub(amount.abs())
            .ok_or(AppError::InsufficientCreditLimit)?,
    };

    if new_limit <= Decimal::ZERO {
        return Err(AppError::InsufficientCreditLimit);
    }

    Ok(new_limit)
}

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    accounts: AccountService,
    operation_types: OperationTypeService,
    ledger: Option<Arc<dyn AtomicLedger>>,
    deadline: Duration,
}

impl TransactionService {
    /// Service running the compensating workflow.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        accounts: AccountService,
        operation_types: OperationTypeService,
        deadline: Duration,
    ) -> Self {
        Self {
            store,
            accounts,
            operation_types,
            ledger: None,
            deadline,
        }
    }

    /// Switch to the atomic workflow backed by `ledger`.
    pub fn with_atomic_ledger(mut self, ledger: Arc<dyn AtomicLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn is_atomic(&self) -> bool {
        self.ledger.is_some()
    }

    /// Record a transaction and apply it to the account's credit limit.
    ///
    /// # Errors
    ///
    /// - `NotFound(Account)` / `NotFound(OperationType)`: unknown reference, nothing written
    /// - `InvalidAmount`: negative amount on a credit operation, nothing written
    /// - `InsufficientCreditLimit`: resulting limit would be `<= 0`, nothing written
    /// - `Database` / `DeadlineExceeded`: store failure; in compensating mode the
    ///   previous limit has been restored if the insert was the failing step
    /// - `CompensationFailed`: the insert failed and the limit could not be restored
    pub async fn create(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let result = match &self.ledger {
            Some(ledger) => {
                self.create_atomic(ledger.as_ref(), account_id, operation_type_id, amount)
                    .await
            }
            None => {
                self.create_compensating(account_id, operation_type_id, amount)
                    .await
            }
        };

        match &result {
            Ok(transaction) => tracing::info!(
                transaction_id = transaction.id,
                account_id,
                operation_type_id,
                %amount,
                "transaction recorded"
            ),
            Err(
                e @ (AppError::NotFound(_)
                | AppError::InvalidAmount
                | AppError::InsufficientCreditLimit),
            ) => tracing::debug!(
                account_id,
                operation_type_id,
                %amount,
                error = %e,
                "transaction rejected"
            ),
            Err(_) => {}
        }

        result
    }

    async fn create_compensating(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let account = self.accounts.get(account_id).await?;
        let operation_type = self.operation_types.get(operation_type_id).await?;

        let new_limit = next_credit_limit(&account, &operation_type, amount)?;

        self.accounts
            .update_credit_limit(account.id, new_limit)
            .await?;

        match with_deadline(
            self.deadline,
            self.store.save(account_id, operation_type_id, amount),
        )
        .await
        {
            Ok(transaction) => Ok(transaction),
            Err(persist_error) => Err(self.compensate(&account, persist_error).await),
        }
    }

    /// Put back the limit `account` had before the workflow touched it.
    ///
    /// Returns the error the caller should see.
    async fn compensate(&self, account: &Account, persist_error: AppError) -> AppError {
        match self
            .accounts
            .update_credit_limit(account.id, account.available_credit_limit)
            .await
        {
            Ok(_) => {
                tracing::warn!(
                    account_id = account.id,
                    error = %persist_error,
                    "transaction insert failed, credit limit restored"
                );
                persist_error
            }
            Err(compensation) => {
                tracing::error!(
                    account_id = account.id,
                    expected_limit = %account.available_credit_limit,
                    compensation_error = %compensation,
                    cause = %persist_error,
                    "credit limit could not be restored; account limit no longer matches its transactions"
                );
                AppError::CompensationFailed {
                    account_id: account.id,
                    compensation: Box::new(compensation),
                    cause: Box::new(persist_error),
                }
            }
        }
    }

    async fn create_atomic(
        &self,
        ledger: &dyn AtomicLedger,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let plan: LimitPlan<'_> =
            &move |account, operation_type| next_credit_limit(account, operation_type, amount);

        with_deadline(
            self.deadline,
            ledger.apply(account_id, operation_type_id, amount, plan),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn account(limit: Decimal) -> Account {
        Account {
            id: 1,
            document_number: "12345678900".to_string(),
            available_credit_limit: limit,
        }
    }

    fn operation(id: i64) -> OperationType {
        OperationType {
            id,
            description: String::new(),
        }
    }

    #[rstest]
    #[case::negative_debit(dec!(100.00), 1, dec!(-30.00), dec!(70.00))]
    #[case::positive_debit(dec!(100.00), 3, dec!(30.00), dec!(70.00))]
    #[case::credit(dec!(100.00), 4, dec!(50.00), dec!(150.00))]
    #[case::zero_credit(dec!(100.00), 4, dec!(0), dec!(100.00))]
    #[case::leaves_one_cent(dec!(20.00), 2, dec!(-19.99), dec!(0.01))]
    fn test_next_credit_limit(
        #[case] limit: Decimal,
        #[case] operation_type_id: i64,
        #[case] amount: Decimal,
        #[case] expected: Decimal,
    ) {
        let new_limit =
            next_credit_limit(&account(limit), &operation(operation_type_id), amount).unwrap();
        assert_eq!(new_limit, expected);
    }

    #[rstest]
    #[case::overdraw(dec!(20.00), 2, dec!(25.00))]
    #[case::overdraw_negative_sign(dec!(20.00), 1, dec!(-25.00))]
    #[case::exactly_zero(dec!(20.00), 3, dec!(20.00))]
    #[case::credit_onto_negative_limit(dec!(-50.00), 4, dec!(10.00))]
    #[case::debit_underflow(Decimal::MIN, 1, Decimal::MAX)]
    fn test_insufficient_credit_limit(
        #[case] limit: Decimal,
        #[case] operation_type_id: i64,
        #[case] amount: Decimal,
    ) {
        let err = next_credit_limit(&account(limit), &operation(operation_type_id), amount)
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientCreditLimit));
    }

    #[rstest]
    #[case::negative_credit(dec!(100.00), dec!(-10.00))]
    #[case::credit_overflow(Decimal::MAX, Decimal::ONE)]
    fn test_invalid_credit_amount(#[case] limit: Decimal, #[case] amount: Decimal) {
        let err = next_credit_limit(&account(limit), &operation(4), amount).unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));
    }
}
