//! Account service - account lifecycle and the only credit-limit mutation path.

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;

use crate::{
    error::{AppError, Resource},
    models::account::Account,
    services::with_deadline,
    stores::AccountStore,
};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    deadline: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Open a new account.
    ///
    /// # Errors
    ///
    /// - `Database`: the insert failed
    /// - `DeadlineExceeded`: the store did not answer in time
    pub async fn create(
        &self,
        document_number: &str,
        available_credit_limit: Decimal,
    ) -> Result<Account, AppError> {
        let account = with_deadline(
            self.deadline,
            self.store.save(document_number, available_credit_limit),
        )
        .await?;

        tracing::info!(account_id = account.id, "account created");
        Ok(account)
    }

    /// Get account by ID.
    ///
    /// # Errors
    ///
    /// - `NotFound(Account)`: no account has this id
    /// - `Database` / `DeadlineExceeded`: store failure
    pub async fn get(&self, id: i64) -> Result<Account, AppError> {
        with_deadline(self.deadline, self.store.get_by_id(id))
            .await?
            .ok_or(AppError::NotFound(Resource::Account))
    }

    /// Set the account's available credit limit to `new_limit`.
    ///
    /// This is the single authorized way to change the limit. The account is
    /// re-read so the write is based on the stored row, not a caller's copy.
    pub async fn update_credit_limit(&self, id: i64, new_limit: Decimal) -> Result<Account, AppError> {
        let mut account = self.get(id).await?;
        account.available_credit_limit = new_limit;

        with_deadline(self.deadline, self.store.update(&account)).await
    }
}
