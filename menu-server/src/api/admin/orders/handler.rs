//! Admin Order Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{OrderDetail, OrderFilter, OrderStatus, OrderSummary};
use shared::response::Page;

use crate::api::admin::Affected;
use crate::api::orders::{order_detail, order_not_found};
use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{ApiResponse, AppResult, ok};

/// GET /api/admin/orders 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrderListQuery {
    fn filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status,
            table_id: self.table_id,
        }
    }
}

/// GET /api/admin/orders - 分页列表，最新在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Page<OrderSummary>>>> {
    let (page, per_page, offset) = state.page_window(query.page, query.per_page);
    let (items, total) = order::list(state.pool(), &query.filter(), per_page, offset).await?;
    Ok(ok(Page::new(items, page, per_page, total)))
}

/// GET /api/admin/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    Ok(ok(order_detail(&state, id).await?))
}

/// DELETE /api/admin/orders/:id - 删除订单 (连同明细和留言)
pub async fn delete(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    if !order::delete(state.pool(), id).await? {
        return Err(order_not_found(id));
    }
    tracing::info!(order_id = id, staff = %staff.username, "Order deleted");
    Ok(ok(Affected { affected: 1 }))
}

/// DELETE /api/admin/orders?status=&table_id= - 批量删除
pub async fn delete_all(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let affected = order::delete_all(state.pool(), &filter).await?;
    tracing::info!(
        affected,
        status = ?filter.status,
        table_id = ?filter.table_id,
        staff = %staff.username,
        "Orders deleted"
    );
    Ok(ok(Affected { affected }))
}

/// POST /api/admin/orders/:id/accept - 接单并通知顾客
pub async fn accept(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    state.notifier.accept_order(id).await?;
    tracing::info!(order_id = id, staff = %staff.username, "Order accepted");
    Ok(ok(order_detail(&state, id).await?))
}
