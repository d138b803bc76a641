//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentStaff`] - 当前员工上下文
//! - [`require_staff`] - 认证中间件
//! - [`password`] - argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentStaff, JwtConfig, JwtError, JwtService};
pub use middleware::{authenticate, require_staff};
