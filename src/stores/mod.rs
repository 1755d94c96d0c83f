//! Persistence contracts consumed by the services.
//!
//! Each trait is one store the workflow talks to. `PgStore` and `MemoryStore`
//! implement all of them; tests wrap `MemoryStore` to inject failures.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::{account::Account, operation_type::OperationType, transaction::Transaction};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Computes the new credit limit from the locked account and its operation type.
///
/// Returning an error aborts the storage transaction without writing anything.
pub type LimitPlan<'a> =
    &'a (dyn Fn(&Account, &OperationType) -> Result<Decimal, AppError> + Send + Sync);

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned id
    async fn save(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;

    /// Overwrite the stored account with `account`.
    ///
    /// Fails with `NotFound(Account)` when no row has that id.
    async fn update(&self, account: &Account) -> Result<Account, AppError>;
}

#[async_trait]
pub trait OperationTypeStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<OperationType>, AppError>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Append a transaction row; the store assigns `id` and `event_date`
    async fn save(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError>;
}

/// Runs the whole limit update and transaction insert as one unit.
///
/// Implementations lock the account from the first read until the commit, so
/// concurrent calls for the same account are serialized and nothing is written
/// unless every step succeeds.
#[async_trait]
pub trait AtomicLedger: Send + Sync {
    async fn apply(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
        plan: LimitPlan<'_>,
    ) -> Result<Transaction, AppError>;
}
