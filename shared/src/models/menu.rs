//! Menu views served to table clients

use serde::{Deserialize, Serialize};

use super::{Category, DiningTable, Item, OrderDetail};

/// A category with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<Item>,
}

/// Everything a table client needs on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMenu {
    pub table: DiningTable,
    pub menu: Vec<MenuCategory>,
    /// The table's draft order, if one is open
    pub order: Option<OrderDetail>,
}
