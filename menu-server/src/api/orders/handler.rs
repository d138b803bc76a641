//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Comment, CommentCreate, Item, Order, OrderDetail, OrderItemAdd, OrderItemSet, OrderStatus};

use super::{order_detail, order_not_found};
use crate::core::ServerState;
use crate::db::repository::{RepoError, comment, item, order};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(ok(order_detail(&state, id).await?))
}

/// POST /api/orders/:id/items - 加菜 (已有则累加数量)
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemAdd>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    if payload.count < 1 {
        return Err(AppError::with_message(ErrorCode::ValueOutOfRange, "count must be at least 1")
            .with_detail("count", payload.count));
    }
    ensure_draft(&state, id).await?;
    let it = find_item(&state, payload.item_id).await?;
    if !it.available {
        return Err(AppError::new(ErrorCode::ItemUnavailable).with_detail("item_id", it.id));
    }

    match order::add_item(state.pool(), id, it.id, payload.count).await {
        Ok(()) => {}
        // order locked or item withdrawn after the checks above
        Err(RepoError::Conflict(_)) => {
            let unavailable = AppError::new(ErrorCode::ItemUnavailable).with_detail("item_id", it.id);
            return Err(edit_rejected(&state, id, unavailable).await);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(ok(order_detail(&state, id).await?))
}

/// PUT /api/orders/:id/items/:item_id - 设置数量 (0 删除)
pub async fn set_item(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderItemSet>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    if payload.count < 0 {
        return Err(AppError::with_message(ErrorCode::ValueOutOfRange, "count must not be negative")
            .with_detail("count", payload.count));
    }
    ensure_draft(&state, id).await?;

    match order::set_item_count(state.pool(), id, item_id, payload.count).await {
        Ok(()) => {}
        Err(RepoError::NotFound(_)) => {
            return Err(edit_rejected(&state, id, line_not_found(id, item_id)).await);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(ok(order_detail(&state, id).await?))
}

/// DELETE /api/orders/:id/items/:item_id
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    ensure_draft(&state, id).await?;
    if !order::remove_item(state.pool(), id, item_id).await? {
        return Err(edit_rejected(&state, id, line_not_found(id, item_id)).await);
    }
    Ok(ok(order_detail(&state, id).await?))
}

/// POST /api/orders/:id/place - 下单并通知员工
pub async fn place(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    state.notifier.place_order(id).await?;
    Ok(ok(order_detail(&state, id).await?))
}

/// POST /api/orders/:id/cancel - 取消待接单的订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    state.notifier.cancel_order(id).await?;
    Ok(ok(order_detail(&state, id).await?))
}

/// GET /api/orders/:id/comments
pub async fn list_comments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Comment>>>> {
    find_order(&state, id).await?;
    Ok(ok(comment::list_for_order(state.pool(), id).await?))
}

/// POST /api/orders/:id/comments
pub async fn add_comment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentCreate>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let (created, _) = state.notifier.add_comment(id, &payload.body).await?;
    Ok(ok(created))
}

async fn find_order(state: &ServerState, id: i64) -> AppResult<Order> {
    order::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// Lines can only change while the order is a draft
async fn ensure_draft(state: &ServerState, id: i64) -> AppResult<Order> {
    let current = find_order(state, id).await?;
    if current.status() != OrderStatus::Draft {
        return Err(AppError::new(ErrorCode::OrderLocked)
            .with_detail("order_id", id)
            .with_detail("status", current.status().as_str()));
    }
    Ok(current)
}

/// Classify a guarded line edit that matched no row: a lock taken since
/// `ensure_draft` wins over `fallback`
async fn edit_rejected(state: &ServerState, id: i64, fallback: AppError) -> AppError {
    match ensure_draft(state, id).await {
        Ok(_) => fallback,
        Err(e) => e,
    }
}

async fn find_item(state: &ServerState, id: i64) -> AppResult<Item> {
    item::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ItemNotFound, format!("Item {id} not found"))
            .with_detail("item_id", id)
    })
}

fn line_not_found(order_id: i64, item_id: i64) -> AppError {
    AppError::new(ErrorCode::OrderItemNotFound)
        .with_detail("order_id", order_id)
        .with_detail("item_id", item_id)
}
