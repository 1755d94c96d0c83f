use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::AppError, models::operation_type::OperationType, state::AppState};

/// `GET /operation-types/{id}`
///
/// 404 for an unknown id, 422 when the id is not positive.
pub async fn get_operation_type(
    State(state): State<AppState>,
    Path(operation_type_id): Path<i64>,
) -> Result<Json<OperationType>, AppError> {
    if operation_type_id < 1 {
        return Err(AppError::InvalidRequest(
            "operation type id must be positive".to_string(),
        ));
    }

    let operation_type = state.operation_types.get(operation_type_id).await?;

    Ok(Json(operation_type))
}
