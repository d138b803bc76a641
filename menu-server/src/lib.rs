//! Menu Server - 餐桌扫码点餐服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 存储菜单、订单、评论、通知
//! - **认证** (`auth`): 员工 JWT + Argon2
//! - **通知** (`notify`): 订单状态转换、通知落库与组广播
//! - **HTTP API** (`api`): 顾客点餐接口与员工管理接口
//! - **WebSocket** (`ws`): 员工端与顾客端实时推送
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由装配与中间件
//! ├── ws/            # WebSocket 会话
//! ├── notify/        # 广播组与通知服务
//! ├── utils/         # 错误、日志、金额
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod routes;
pub mod utils;
pub mod ws;

// Re-export 公共类型
pub use auth::{CurrentStaff, JwtService};
pub use core::{Config, Server, ServerState};
pub use notify::{ChannelLayer, NotificationService};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` (文件不存在时忽略)
pub fn setup_environment() {
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  __  __
  / /|_/ / _ \/ __ \/ / / /
 / /  / /  __/ / / / /_/ /
/_/  /_/\___/_/ /_/\__,_/
    "#
    );
}
