//! Order API 模块 (顾客端)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders/{id} | GET | 订单详情 |
//! | /api/orders/{id}/items | POST | 加菜 |
//! | /api/orders/{id}/items/{item_id} | PUT / DELETE | 改数量 / 删除 |
//! | /api/orders/{id}/place | POST | 下单 |
//! | /api/orders/{id}/cancel | POST | 取消 |
//! | /api/orders/{id}/comments | GET / POST | 留言 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};
use shared::models::OrderDetail;

use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", post(handler::add_item))
        .route("/{id}/items/{item_id}", put(handler::set_item).delete(handler::remove_item))
        .route("/{id}/place", post(handler::place))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/comments", get(handler::list_comments).post(handler::add_comment))
}

/// Load the full order view or fail with `OrderNotFound`
pub(crate) async fn order_detail(state: &ServerState, id: i64) -> AppResult<OrderDetail> {
    order::find_detail(state.pool(), id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

pub(crate) fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("order_id", id)
}
