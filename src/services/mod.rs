//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the domain rules and bound every store call with a deadline.

use std::{future::Future, time::Duration};

use crate::error::AppError;

pub mod account_service;
pub mod operation_type_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use operation_type_service::OperationTypeService;
pub use transaction_service::TransactionService;

/// Run a store call, failing with `DeadlineExceeded` if it outlives `deadline`.
///
/// The timed-out future is dropped, which is how cancellation reaches the store.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| AppError::DeadlineExceeded)?
}
