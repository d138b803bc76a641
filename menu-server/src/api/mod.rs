//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 员工登录
//! - [`menu`] - 菜单与桌台点餐入口
//! - [`orders`] - 顾客订单操作
//! - [`media`] - 菜品图片
//! - [`admin`] - 员工管理接口 (JWT)

pub mod admin;
pub mod auth;
pub mod health;
pub mod media;
pub mod menu;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
