//! Menu API 模块
//!
//! 顾客扫码入口：菜单浏览与开单

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(handler::menu))
        .route("/api/tables/{id}/menu", get(handler::table_menu))
        .route("/api/tables/{id}/orders", post(handler::open_order))
}
