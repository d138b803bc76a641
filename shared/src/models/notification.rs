//! Notification Model

use serde::{Deserialize, Serialize};

/// What kind of order transition produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum NotificationKind {
    NewOrder,
    NewComment,
    Cancel,
    Accept,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewOrder => "new_order",
            NotificationKind::NewComment => "new_comment",
            NotificationKind::Cancel => "cancel",
            NotificationKind::Accept => "accept",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_order" => Ok(NotificationKind::NewOrder),
            "new_comment" => Ok(NotificationKind::NewComment),
            "cancel" => Ok(NotificationKind::Cancel),
            "accept" => Ok(NotificationKind::Accept),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub body: String,
    pub kind: NotificationKind,
    pub opened: bool,
    /// Null once the order has been deleted
    pub order_id: Option<i64>,
    pub url: String,
    pub created_at: i64,
}

/// Notification list query (`GET /api/admin/notifications`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unopened: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
