//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cart item entity. At most one row exists per (user, dish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub dish_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line joined with the current catalog state of its dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub cart_item_id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    /// Current catalog price (not a purchase snapshot)
    pub unit_price: Decimal,
    pub quantity: i64,
    /// unit_price × quantity at current prices
    pub line_total: Decimal,
    pub stock_quantity: i64,
    pub is_available: bool,
}
