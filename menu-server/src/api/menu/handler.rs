//! Menu API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, ItemFilter, MenuCategory, OrderDetail, TableMenu};

use crate::api::orders::order_detail;
use crate::core::ServerState;
use crate::db::repository::{category, dining_table, item, order};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// GET /api/menu - 分类及其可售菜品
pub async fn menu(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuCategory>>>> {
    Ok(ok(load_menu(&state).await?))
}

/// GET /api/tables/:id/menu - 桌台、菜单和当前草稿订单
pub async fn table_menu(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TableMenu>>> {
    let table = find_table(&state, id).await?;
    let menu = load_menu(&state).await?;

    let order = match order::find_open_for_table(state.pool(), id).await? {
        Some(draft) => Some(order_detail(&state, draft.id).await?),
        None => None,
    };

    Ok(ok(TableMenu { table, menu, order }))
}

/// POST /api/tables/:id/orders - 打开桌台草稿订单 (已存在则复用)
pub async fn open_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    find_table(&state, id).await?;
    let draft = order::open_for_table(state.pool(), id).await?;
    tracing::debug!(table_id = id, order_id = draft.id, "Draft order opened");
    Ok(ok(order_detail(&state, draft.id).await?))
}

async fn find_table(state: &ServerState, id: i64) -> AppResult<DiningTable> {
    dining_table::find_by_id(state.pool(), id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
            .with_detail("table_id", id)
    })
}

/// Categories in name order, each with its available items
async fn load_menu(state: &ServerState) -> AppResult<Vec<MenuCategory>> {
    let categories = category::find_all(state.pool()).await?;
    let filter = ItemFilter {
        category_id: None,
        available_only: true,
    };

    let mut by_category: HashMap<i64, Vec<_>> = HashMap::new();
    for it in item::find_all(state.pool(), &filter).await? {
        by_category.entry(it.category_id).or_default().push(it);
    }

    Ok(categories
        .into_iter()
        .map(|category| MenuCategory {
            items: by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect())
}
