//! 工具模块
//!
//! - [`AppError`] / [`ApiResponse`] - 错误与响应 (from shared::error)
//! - [`logger`] - 日志
//! - [`money`] - 金额计算

pub mod error;
pub mod logger;
pub mod money;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
