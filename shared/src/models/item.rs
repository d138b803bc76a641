//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Maximum length of an item name
pub const ITEM_NAME_MAX_LEN: usize = 150;

/// Directory (relative to the work dir) holding uploaded item images
pub const ITEM_IMAGE_DIR: &str = "media/images/items";

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    /// Relative path under `media/images/items/`
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub available: Option<bool>,
}

/// Update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
}

/// Item list filter (query string of `GET /api/admin/items`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub available_only: bool,
}
