//! Admin Category Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::api::admin::Affected;
use crate::core::ServerState;
use crate::db::repository::{RepoError, category};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// GET /api/admin/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    Ok(ok(category::find_all(state.pool()).await?))
}

/// GET /api/admin/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let found = category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(found))
}

/// POST /api/admin/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let created = category::create(state.pool(), payload)
        .await
        .map_err(|e| map_error(e, None))?;
    tracing::info!(category_id = created.id, name = %created.name, "Category created");
    Ok(ok(created))
}

/// PUT /api/admin/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let updated = category::update(state.pool(), id, payload)
        .await
        .map_err(|e| map_error(e, Some(id)))?;
    Ok(ok(updated))
}

/// DELETE /api/admin/categories/:id - 删除分类及其菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    if !category::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(ok(Affected { affected: 1 }))
}

fn map_error(err: RepoError, id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::CategoryNameExists),
        RepoError::NotFound(_) => match id {
            Some(id) => not_found(id),
            None => AppError::new(ErrorCode::CategoryNotFound),
        },
        other => other.into(),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
}
