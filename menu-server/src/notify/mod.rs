//! 实时通知
//!
//! - [`ChannelLayer`] - 命名组广播
//! - [`NotificationService`] - 订单状态转换 → 通知记录 + 广播

pub mod channel;
pub mod service;

pub use channel::ChannelLayer;
pub use service::{NotificationService, Notified, order_group};
