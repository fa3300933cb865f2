//! Dish Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dish entity
///
/// `price` always carries exactly two decimal places. `stock_quantity`
/// never goes below zero (enforced by a CHECK constraint and by the
/// conditional updates in the engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: Option<String>,
    pub category: String,
    pub stock_quantity: i64,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Dish {
    /// Whether `quantity` units can currently be sold
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.is_available && quantity <= self.stock_quantity
    }
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i64,
}

/// Update dish payload (unset fields keep their value)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DishUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i64>,
    pub is_available: Option<bool>,
}
