//! Admin Dining Table Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::api::admin::Affected;
use crate::core::ServerState;
use crate::db::repository::{RepoError, dining_table};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    Ok(ok(dining_table::find_all(state.pool()).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let found = dining_table::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(found))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let created = dining_table::create(state.pool(), payload)
        .await
        .map_err(|e| map_error(e, None))?;
    tracing::info!(table_id = created.id, name = %created.name, "Table created");
    Ok(ok(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let updated = dining_table::update(state.pool(), id, payload)
        .await
        .map_err(|e| map_error(e, Some(id)))?;
    Ok(ok(updated))
}

/// Deleting a table also deletes its orders
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    if !dining_table::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(table_id = id, "Table deleted");
    Ok(ok(Affected { affected: 1 }))
}

fn map_error(err: RepoError, id: Option<i64>) -> AppError {
    match (err, id) {
        (RepoError::Duplicate(_), _) => AppError::new(ErrorCode::TableNameExists),
        (RepoError::NotFound(_), Some(id)) => not_found(id),
        (other, _) => other.into(),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::TableNotFound).with_detail("table_id", id)
}
