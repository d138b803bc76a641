//! 统一错误处理
//!
//! 错误类型来自 `shared::error`，这里补充 handler 常用的响应构造函数。
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::OrderNotFound))
//!
//! // 返回成功响应
//! Ok(ok(order))
//! ```

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 成功响应
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 带消息的成功响应
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
