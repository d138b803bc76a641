//! Notification message types
//!
//! These types are shared between menu-server and its WebSocket clients.
//! A [`NotificationEvent`] is what the channel layer fans out to a group;
//! [`WsServerMessage`] is the frame a WebSocket session writes.

use serde::{Deserialize, Serialize};

use crate::models::{Notification, NotificationKind};

/// Event broadcast to every subscriber of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub notification_id: i64,
    pub order_id: Option<i64>,
    /// Table name of the order, when known
    pub table: Option<String>,
    pub body: String,
    pub url: String,
    pub created_at: i64,
    /// Unopened notifications after this one was stored
    pub unread: i64,
}

impl NotificationEvent {
    pub fn from_notification(n: &Notification, table: Option<String>, unread: i64) -> Self {
        Self {
            kind: n.kind,
            notification_id: n.id,
            order_id: n.order_id,
            table,
            body: n.body.clone(),
            url: n.url.clone(),
            created_at: n.created_at,
            unread,
        }
    }
}

/// Frame sent from server to a WebSocket client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// First frame after subscribing, and again after a resync
    Ready { unread: i64 },
    Notification { event: NotificationEvent },
}

impl WsServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
