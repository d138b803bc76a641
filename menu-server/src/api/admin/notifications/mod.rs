//! Admin Notification API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        // 固定路径放在 /{id} 之前
        .route("/unread-count", get(handler::unread_count))
        .route("/open-all", post(handler::open_all))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/open", post(handler::open))
}
