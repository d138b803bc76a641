//! ChannelLayer - 按组名广播通知
//!
//! ```text
//! NotificationService ──group_send("admin_notifications")──► Sender ──► admin WS sessions
//!                     └─group_send("order_42")─────────────► Sender ──► order 42 WS sessions
//! ```
//!
//! 每个组是一个惰性创建的 `tokio::sync::broadcast` channel。
//! 投递是尽力而为：无订阅者不算错误，落后的接收者会丢消息 (`Lagged`)。

use dashmap::DashMap;
use shared::message::NotificationEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default per-group buffer
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct ChannelLayer {
    /// group name → sender
    groups: Arc<DashMap<String, broadcast::Sender<NotificationEvent>>>,
    capacity: usize,
}

impl Default for ChannelLayer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChannelLayer {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// 订阅组 (不存在则创建)
    pub fn group_add(&self, name: &str) -> broadcast::Receiver<NotificationEvent> {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 发送到组内当前所有订阅者，返回送达数量
    pub fn group_send(&self, name: &str, event: NotificationEvent) -> usize {
        match self.groups.get(name) {
            // 无订阅者时 send 返回 Err，安全忽略
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// 当前订阅者数量
    pub fn receiver_count(&self, name: &str) -> usize {
        self.groups.get(name).map(|tx| tx.receiver_count()).unwrap_or(0)
    }

    /// 清理没有订阅者的组，返回清理数量
    pub fn prune(&self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|_, tx| tx.receiver_count() > 0);
        before - self.groups.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
