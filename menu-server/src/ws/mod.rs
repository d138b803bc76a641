//! WebSocket 实时推送
//!
//! | 路径 | 认证 | 订阅组 |
//! |------|------|--------|
//! | /ws/admin?token=<JWT> | JWT (query，浏览器 WebSocket 不支持自定义 headers) | `Config::notify_group` |
//! | /ws/orders/{id} | 无 | `order_{id}` |
//!
//! 协议 (Server → Client，文本帧 JSON):
//! - `{"type":"ready","unread":N}` 订阅后首帧，落后重订阅后再次发送
//! - `{"type":"notification","event":{...}}` 每条通知一帧

mod session;

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Deserialize;

use crate::api::orders::order_not_found;
use crate::auth::authenticate;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::security_log;
use crate::utils::AppError;

pub use session::Audience;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/ws/admin", get(admin_ws))
        .route("/ws/orders/{id}", get(order_ws))
}

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: String,
}

/// GET /ws/admin?token=<JWT>
pub async fn admin_ws(
    State(state): State<ServerState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let staff = authenticate(&state, &query.token).map_err(|e| {
        security_log!("WARN", "ws_auth_failed", error = e.message.clone());
        e
    })?;

    tracing::info!(staff = %staff.username, "Admin WS connecting");
    Ok(ws.on_upgrade(move |socket| session::run(socket, state, Audience::Admin)))
}

/// GET /ws/orders/:id
pub async fn order_ws(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    if order::find_by_id(state.pool(), id).await?.is_none() {
        return Err(order_not_found(id));
    }
    Ok(ws.on_upgrade(move |socket| session::run(socket, state, Audience::Order(id))))
}
