//! Comment Model

use serde::{Deserialize, Serialize};

/// Comment on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Comment {
    pub id: i64,
    pub order_id: i64,
    pub body: String,
    pub created_at: i64,
}

/// Create comment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub body: String,
}
