//! PostgreSQL store backed by the sqlx connection pool.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    error::{AppError, Resource},
    models::{account::Account, operation_type::OperationType, transaction::Transaction},
    stores::{AccountStore, AtomicLedger, LimitPlan, OperationTypeStore, TransactionStore},
};

/// Roll back after a rejected step, keeping the rejection as the caller's error.
async fn rollback(tx: sqlx::Transaction<'_, sqlx::Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed, connection will discard the transaction");
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn save(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (document_number, available_credit_limit)
            VALUES ($1, $2)
            RETURNING id, document_number, available_credit_limit
            "#,
        )
        .bind(document_number)
        .bind(available_credit_limit)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, document_number, available_credit_limit FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, AppError> {
        // document_number is immutable, so only the limit is written back
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET available_credit_limit = $1
            WHERE id = $2
            RETURNING id, document_number, available_credit_limit
            "#,
        )
        .bind(account.available_credit_limit)
        .bind(account.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound(Resource::Account))
    }
}

#[async_trait]
impl OperationTypeStore for PgStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<OperationType>, AppError> {
        let operation_type = sqlx::query_as::<_, OperationType>(
            "SELECT id, description FROM operation_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(operation_type)
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn save(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (account_id, operation_type_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, operation_type_id, amount, event_date
            "#,
        )
        .bind(account_id)
        .bind(operation_type_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }
}

#[async_trait]
impl AtomicLedger for PgStore {
    /// # Process
    ///
    /// 1. Start database transaction
    /// 2. Lock the account row (`FOR UPDATE`)
    /// 3. Load the operation type
    /// 4. Compute the new limit with `plan`
    /// 5. Update the limit and insert the transaction row
    /// 6. Commit (or rollback on error)
    ///
    /// If the future is dropped before commit, sqlx rolls the transaction back.
    async fn apply(
        &self,
        account_id: i64,
        operation_type_id: i64,
        amount: Decimal,
        plan: LimitPlan<'_>,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE holds the row lock until commit/rollback
        let Some(account) = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, document_number, available_credit_limit
            FROM accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            rollback(tx).await;
            return Err(AppError::NotFound(Resource::Account));
        };

        let Some(operation_type) = sqlx::query_as::<_, OperationType>(
            "SELECT id, description FROM operation_types WHERE id = $1",
        )
        .bind(operation_type_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            rollback(tx).await;
            return Err(AppError::NotFound(Resource::OperationType));
        };

        let new_limit = match plan(&account, &operation_type) {
            Ok(limit) => limit,
            Err(e) => {
                rollback(tx).await;
                return Err(e);
            }
        };

        sqlx::query("UPDATE accounts SET available_credit_limit = $1 WHERE id = $2")
            .bind(new_limit)
            .bind(account.id)
            .execute(&mut *tx)
            .await?;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (account_id, operation_type_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, operation_type_id, amount, event_date
            "#,
        )
        .bind(account.id)
        .bind(operation_type.id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        // Limit update and transaction row become visible together
        tx.commit().await?;

        Ok(transaction)
    }
}
