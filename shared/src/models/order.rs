//! Order Model
//!
//! An order belongs to one dining table and moves through
//! `draft -> pending -> accepted`, with `canceled` reachable from `pending`.
//! Status is derived from the three stored flags and never persisted.

use serde::{Deserialize, Serialize};

use super::Comment;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub ordered: bool,
    pub canceled: bool,
    pub order_accept: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub ordered_at: Option<i64>,
}

impl Order {
    /// Derive the status from the stored flags
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_flags(self.ordered, self.canceled, self.order_accept)
    }
}

/// Derived order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Still being filled in at the table
    #[default]
    Draft,
    /// Placed, waiting for staff
    Pending,
    /// Accepted by staff
    Accepted,
    Canceled,
}

impl OrderStatus {
    pub fn from_flags(ordered: bool, canceled: bool, order_accept: bool) -> Self {
        if canceled {
            OrderStatus::Canceled
        } else if !ordered {
            OrderStatus::Draft
        } else if order_accept {
            OrderStatus::Accepted
        } else {
            OrderStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// SQL predicate over the `orders` flag columns selecting this status
    pub fn sql_predicate(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "ordered = 0 AND canceled = 0",
            OrderStatus::Pending => "ordered = 1 AND canceled = 0 AND order_accept = 0",
            OrderStatus::Accepted => "ordered = 1 AND canceled = 0 AND order_accept = 1",
            OrderStatus::Canceled => "canceled = 1",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(OrderStatus::Draft),
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// One line of an order, joined with the item it refers to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub item_id: i64,
    pub name: String,
    pub price: f64,
    pub count: i64,
    /// price x count, rounded to cents
    #[cfg_attr(feature = "db", sqlx(default))]
    #[serde(default)]
    pub subtotal: f64,
}

/// Full order view for customers and staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub status: OrderStatus,
    pub table_name: String,
    pub lines: Vec<OrderLine>,
    pub total: f64,
    pub comments: Vec<Comment>,
}

/// Row of the admin order list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub table_id: i64,
    pub table_name: String,
    pub ordered: bool,
    pub canceled: bool,
    pub order_accept: bool,
    pub item_count: i64,
    pub comment_count: i64,
    pub created_at: i64,
    pub ordered_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub status: OrderStatus,
}

impl OrderSummary {
    /// Fill `status` from the flags (rows come back from SQL without it)
    pub fn with_status(mut self) -> Self {
        self.status = OrderStatus::from_flags(self.ordered, self.canceled, self.order_accept);
        self
    }
}

/// Admin order list filter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
}

/// Add an item to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemAdd {
    pub item_id: i64,
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

/// Set the count of an order line (0 removes it)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemSet {
    pub count: i64,
}
