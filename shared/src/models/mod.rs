//! Data models
//!
//! Shared between menu-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod category;
pub mod comment;
pub mod dining_table;
pub mod item;
pub mod menu;
pub mod notification;
pub mod order;
pub mod staff;

// Re-exports
pub use category::*;
pub use comment::*;
pub use dining_table::*;
pub use item::*;
pub use menu::*;
pub use notification::*;
pub use order::*;
pub use staff::*;
