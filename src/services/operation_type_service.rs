//! Operation type service - lookups against the read-only operation type catalogue.

use std::{sync::Arc, time::Duration};

use crate::{
    error::{AppError, Resource},
    models::operation_type::OperationType,
    services::with_deadline,
    stores::OperationTypeStore,
};

/// Read-only lookup of transaction categories.
#[derive(Clone)]
pub struct OperationTypeService {
    store: Arc<dyn OperationTypeStore>,
    deadline: Duration,
}

impl OperationTypeService {
    pub fn new(store: Arc<dyn OperationTypeStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    pub async fn get(&self, id: i64) -> Result<OperationType, AppError> {
        with_deadline(self.deadline, self.store.get_by_id(id))
            .await?
            .ok_or(AppError::NotFound(Resource::OperationType))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn test_get_seeded_and_missing() {
        let service =
            OperationTypeService::new(Arc::new(MemoryStore::seeded()), Duration::from_secs(1));

        let payment = service.get(4).await.unwrap();
        assert_eq!(payment.description, "Payment");

        let err = service.get(9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::OperationType)));
    }
}
