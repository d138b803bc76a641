//! 员工管理接口
//!
//! 所有路由挂载在 `/api/admin` 下，由 [`require_staff`](crate::auth::require_staff) 保护。

pub mod categories;
pub mod items;
pub mod notifications;
pub mod orders;
pub mod tables;

use serde::Serialize;

/// Result of a delete or bulk update
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Affected {
    pub affected: u64,
}
