//! Admin Item API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /items | GET / POST | 列表 (category_id, available_only) / 创建 |
//! | /items/{id} | GET / PUT / DELETE | 详情 / 更新 / 删除 |
//! | /items/{id}/image | POST / DELETE | 上传图片 (multipart `file`) / 清除 |

mod handler;
mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
        .route(
            "/{id}/image",
            post(upload::upload_image)
                .delete(upload::clear_image)
                // multipart 开销留出余量，真正的大小检查在 handler 内
                .layer(DefaultBodyLimit::max(upload::MAX_FILE_SIZE + 64 * 1024)),
        )
}
