//! Report Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_orders: i64,
    pub total_dishes: i64,
    pub active_departments: i64,
    /// Sum of `total_amount` over non-cancelled orders
    pub revenue: Decimal,
}

/// Per-dish sales over non-cancelled orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishOrderSummary {
    pub dish_id: i64,
    pub dish_name: String,
    pub total_orders: i64,
    pub total_quantity: i64,
    pub total_amount: Decimal,
}

/// Per-department sales over non-cancelled orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentOrderSummary {
    pub department_id: i64,
    pub department_name: String,
    pub total_orders: i64,
    pub total_quantity: i64,
    pub total_amount: Decimal,
}
