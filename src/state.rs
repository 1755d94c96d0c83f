//! Shared state handed to every handler through axum `State`.

use std::{sync::Arc, time::Duration};

use crate::{
    config::TransactionMode,
    db::DbPool,
    services::{AccountService, OperationTypeService, TransactionService},
    stores::{AccountStore, AtomicLedger, OperationTypeStore, TransactionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub operation_types: OperationTypeService,
    pub transactions: TransactionService,

    /// Present when running against PostgreSQL; used by the health check
    pub pool: Option<DbPool>,
}

impl AppState {
    /// Wire all services over one backing store.
    pub fn new<S>(store: Arc<S>, mode: TransactionMode, deadline: Duration) -> Self
    where
        S: AccountStore + OperationTypeStore + TransactionStore + AtomicLedger + 'static,
    {
        let accounts = AccountService::new(store.clone(), deadline);
        let operation_types = OperationTypeService::new(store.clone(), deadline);
        let mut transactions = TransactionService::new(
            store.clone(),
            accounts.clone(),
            operation_types.clone(),
            deadline,
        );

        if mode == TransactionMode::Atomic {
            transactions = transactions.with_atomic_ledger(store);
        }

        Self {
            accounts,
            operation_types,
            transactions,
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }
}
