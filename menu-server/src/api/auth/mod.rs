//! Auth API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// 登录 - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/auth/login", post(handler::login))
}

/// 当前员工信息 - 挂载在 `/api/admin` 下
pub fn admin_router() -> Router<ServerState> {
    Router::new().route("/me", get(handler::me))
}
