//! Admin Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /orders | GET | 列表 (status, table_id, page, per_page) |
//! | /orders | DELETE | 按条件批量删除 |
//! | /orders/{id} | GET / DELETE | 详情 / 删除 |
//! | /orders/{id}/accept | POST | 接单 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).delete(handler::delete_all))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/accept", post(handler::accept))
}
