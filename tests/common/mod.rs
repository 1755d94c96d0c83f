//! Store wrappers for driving the workflow into its failure paths.
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use credit_account_service::{
    config::TransactionMode,
    error::AppError,
    models::{account::Account, operation_type::OperationType, transaction::Transaction},
    services::{AccountService, OperationTypeService, TransactionService},
    state::AppState,
    stores::{AccountStore, MemoryStore, OperationTypeStore, TransactionStore},
};
use rust_decimal::Decimal;

pub const DEADLINE: Duration = Duration::from_secs(2);

/// Store failure used wherever a wrapper needs to fail.
pub fn store_failure() -> AppError {
    AppError::Database(sqlx::Error::PoolClosed)
}

/// Seeded memory store and services wired the way the server wires them.
pub fn state(mode: TransactionMode) -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::seeded());
    let state = AppState::new(store.clone(), mode, DEADLINE);
    (store, state)
}

/// Compensating transaction service over individually chosen stores.
pub fn compensating_service(
    accounts: Arc<dyn AccountStore>,
    operation_types: Arc<dyn OperationTypeStore>,
    transactions: Arc<dyn TransactionStore>,
    deadline: Duration,
) -> TransactionService {
    TransactionService::new(
        transactions,
        AccountService::new(accounts, deadline),
        OperationTypeService::new(operation_types, deadline),
        deadline,
    )
}

pub async fn open_account(store: &MemoryStore, limit: Decimal) -> Account {
    AccountStore::save(store, "12345678900", limit)
        .await
        .expect("account saved")
}

pub async fn stored_limit(store: &MemoryStore, account_id: i64) -> Decimal {
    AccountStore::get_by_id(store, account_id)
        .await
        .expect("store readable")
        .expect("account exists")
        .available_credit_limit
}

/// Transaction store whose inserts always fail.
#[derive(Default)]
pub struct FailingTransactionStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl TransactionStore for FailingTransactionStore {
    async fn save(
        &self,
        _account_id: i64,
        _operation_type_id: i64,
        _amount: Decimal,
    ) -> Result<Transaction, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(store_failure())
    }
}

/// Transaction store that answers only after `delay`.
pub struct SlowTransactionStore {
    pub inner: Arc<MemoryStore>,
    pub delay: Duration,
}

#[async_trait]
impl TransactionStore for SlowTransactionStore {
    async fn save(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        tokio::time::sleep(self.delay).await;
        TransactionStore::save(self.inner.as_ref(), account_id, operation_type_id, amount).await
    }
}

/// Account store that starts failing `update` from the `fail_from`-th call (1-based).
pub struct FlakyAccountStore {
    pub inner: Arc<MemoryStore>,
    pub fail_from: usize,
    pub updates: AtomicUsize,
}

impl FlakyAccountStore {
    pub fn new(inner: Arc<MemoryStore>, fail_from: usize) -> Self {
        Self {
            inner,
            fail_from,
            updates: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AccountStore for FlakyAccountStore {
    async fn save(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError> {
        AccountStore::save(self.inner.as_ref(), document_number, available_credit_limit).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        AccountStore::get_by_id(self.inner.as_ref(), id).await
    }

    async fn update(&self, account: &Account) -> Result<Account, AppError> {
        let call = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.fail_from {
            return Err(store_failure());
        }
        self.inner.update(account).await
    }
}

/// Operation type store that counts lookups.
pub struct CountingOperationTypeStore {
    pub inner: Arc<MemoryStore>,
    pub lookups: AtomicUsize,
}

impl CountingOperationTypeStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl OperationTypeStore for CountingOperationTypeStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<OperationType>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        OperationTypeStore::get_by_id(self.inner.as_ref(), id).await
    }
}

/// Account store whose reads all rendezvous at `barrier` before returning.
///
/// With two parties, two workflow runs both read the account before either
/// writes it back.
pub struct LockstepAccountStore {
    pub inner: Arc<MemoryStore>,
    pub barrier: Barrier,
}

impl LockstepAccountStore {
    pub fn new(inner: Arc<MemoryStore>, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl AccountStore for LockstepAccountStore {
    async fn save(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError> {
        AccountStore::save(self.inner.as_ref(), document_number, available_credit_limit).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = AccountStore::get_by_id(self.inner.as_ref(), id).await;
        self.barrier.wait().await;
        account
    }

    async fn update(&self, account: &Account) -> Result<Account, AppError> {
        self.inner.update(account).await
    }
}
