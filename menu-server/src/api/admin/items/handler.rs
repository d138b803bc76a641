//! Admin Item Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Item, ItemCreate, ItemFilter, ItemUpdate};

use crate::api::admin::Affected;
use crate::core::ServerState;
use crate::db::repository::{RepoError, category, item};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// GET /api/admin/items?category_id=&available_only=
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    Ok(ok(item::find_all(state.pool(), &filter).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Item>>> {
    Ok(ok(find_item(&state, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<ApiResponse<Item>>> {
    check_price(payload.price)?;
    ensure_category(&state, payload.category_id).await?;

    let created = item::create(state.pool(), payload).await?;
    tracing::info!(item_id = created.id, name = %created.name, "Item created");
    Ok(ok(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<ApiResponse<Item>>> {
    if let Some(price) = payload.price {
        check_price(price)?;
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id).await?;
    }

    let updated = item::update(state.pool(), id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => item_not_found(id),
            other => other.into(),
        })?;
    Ok(ok(updated))
}

/// Order lines referring to the item are removed with it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    if !item::delete(state.pool(), id).await? {
        return Err(item_not_found(id));
    }
    tracing::info!(item_id = id, "Item deleted");
    Ok(ok(Affected { affected: 1 }))
}

pub(super) async fn find_item(state: &ServerState, id: i64) -> AppResult<Item> {
    item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| item_not_found(id))
}

pub(super) fn item_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ItemNotFound).with_detail("item_id", id)
}

fn check_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::new(ErrorCode::ItemInvalidPrice).with_detail("price", price));
    }
    Ok(())
}

async fn ensure_category(state: &ServerState, id: i64) -> AppResult<()> {
    match category::find_by_id(state.pool(), id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)),
    }
}
