//! In-process store used when no database is configured, and by the tests.
//!
//! All tables sit behind one async mutex. Individual calls are atomic, but the
//! compensating workflow still issues them one by one, so it has the same
//! read-modify-write window as the database-backed path. Only `AtomicLedger::apply`
//! holds the lock across the whole unit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, Resource},
    models::{
        account::Account,
        operation_type::{DEFAULT_OPERATION_TYPES, OperationType},
        transaction::Transaction,
    },
    stores::{AccountStore, AtomicLedger, LimitPlan, OperationTypeStore, TransactionStore},
};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    operation_types: BTreeMap<i64, OperationType>,
    transactions: Vec<Transaction>,
    last_account_id: i64,
}

impl Tables {
    fn insert_transaction(
        &mut self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Transaction {
        let transaction = Transaction {
            id: self.transactions.len() as i64 + 1,
            account_id,
            operation_type_id,
            amount,
            event_date: Utc::now(),
        };
        self.transactions.push(transaction.clone());
        transaction
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Empty store with no operation types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the same operation types the migrations seed.
    pub fn seeded() -> Self {
        let operation_types = DEFAULT_OPERATION_TYPES
            .iter()
            .map(|(id, description)| {
                (
                    *id,
                    OperationType {
                        id: *id,
                        description: description.to_string(),
                    },
                )
            })
            .collect();

        Self {
            tables: Mutex::new(Tables {
                operation_types,
                ..Tables::default()
            }),
        }
    }

    /// Snapshot of every persisted transaction, oldest first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.tables.lock().await.transactions.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn save(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError> {
        let mut tables = self.tables.lock().await;
        tables.last_account_id += 1;

        let account = Account {
            id: tables.last_account_id,
            document_number: document_number.to_string(),
            available_credit_limit,
        };
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.tables.lock().await.accounts.get(&id).cloned())
    }

    async fn update(&self, account: &Account) -> Result<Account, AppError> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .accounts
            .get_mut(&account.id)
            .ok_or(AppError::NotFound(Resource::Account))?;

        stored.available_credit_limit = account.available_credit_limit;

        Ok(stored.clone())
    }
}

#[async_trait]
impl OperationTypeStore for MemoryStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<OperationType>, AppError> {
        Ok(self.tables.lock().await.operation_types.get(&id).cloned())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.insert_transaction(account_id, operation_type_id, amount))
    }
}

#[async_trait]
impl AtomicLedger for MemoryStore {
    async fn apply(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
        plan: LimitPlan<'_>,
    ) -> Result<Transaction, AppError> {
        let mut tables = self.tables.lock().await;

        let account = tables
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::Account))?;
        let operation_type = tables
            .operation_types
            .get(&operation_type_id)
            .cloned()
            .ok_or(AppError::NotFound(Resource::OperationType))?;

        let new_limit = plan(&account, &operation_type)?;

        // Nothing below can fail, so both writes land or neither does
        if let Some(stored) = tables.accounts.get_mut(&account_id) {
            stored.available_credit_limit = new_limit;
        }

        Ok(tables.insert_transaction(account_id, operation_type_id, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_account_ids_are_sequential_and_positive() {
        let store = MemoryStore::new();

        let first = AccountStore::save(&store, "111", dec!(10)).await.unwrap();
        let second = AccountStore::save(&store, "222", dec!(20)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(
            AccountStore::get_by_id(&store, 2).await.unwrap(),
            Some(second)
        );
    }

    #[tokio::test]
    async fn test_update_keeps_document_number() {
        let store = MemoryStore::new();
        let account = AccountStore::save(&store, "111", dec!(10)).await.unwrap();

        let updated = store
            .update(&Account {
                document_number: "tampered".to_string(),
                available_credit_limit: dec!(99),
                ..account
            })
            .await
            .unwrap();

        assert_eq!(updated.document_number, "111");
        assert_eq!(updated.available_credit_limit, dec!(99));
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let store = MemoryStore::new();
        let ghost = Account {
            id: 5,
            document_number: "x".to_string(),
            available_credit_limit: dec!(1),
        };

        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::Account)));
    }

    #[tokio::test]
    async fn test_seeded_store_has_default_operation_types() {
        let store = MemoryStore::seeded();

        for (id, description) in DEFAULT_OPERATION_TYPES {
            let operation_type = OperationTypeStore::get_by_id(&store, id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(operation_type.description, description);
        }
        assert!(
            OperationTypeStore::get_by_id(&store, 5)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_apply_writes_nothing_when_plan_fails() {
        let store = MemoryStore::seeded();
        let account = AccountStore::save(&store, "111", dec!(10)).await.unwrap();

        let err = store
            .apply(account.id, 1, dec!(50), &|_, _| {
                Err(AppError::InsufficientCreditLimit)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientCreditLimit));
        let stored = AccountStore::get_by_id(&store, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.available_credit_limit, dec!(10));
        assert!(store.transactions().await.is_empty());
    }
}
