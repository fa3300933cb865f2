//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order status
///
/// ```text
/// pending ──> confirmed ──> preparing ──> ready ──> completed
///    │            │             │
///    └────────────┴─────────────┴──> cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// `completed` and `cancelled` accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `next` is an edge of the status state machine
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed | Cancelled)
                | (Confirmed, Preparing | Cancelled)
                | (Preparing, Ready | Cancelled)
                | (Ready, Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DeliveryType {
    #[default]
    Pickup,
    Delivery,
}

/// Order entity. Immutable after creation except status, remarks and
/// pickup time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Order timestamp (millis)
    pub order_date: i64,
    /// Requested pickup/delivery timestamp (millis)
    pub pickup_time: i64,
    pub delivery_type: DeliveryType,
    pub status: OrderStatus,
    /// Sum of line subtotals
    pub total_amount: Decimal,
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub dish_id: i64,
    pub quantity: i64,
    /// Dish price at purchase time
    pub unit_price: Decimal,
    /// unit_price × quantity
    pub subtotal: Decimal,
}

/// Checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlaceOrder {
    pub pickup_time: i64,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

/// Order bookkeeping update (unset fields keep their value)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    pub pickup_time: Option<i64>,
    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

/// Order line with the dish name resolved (hidden dishes included)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub dish_name: String,
}

/// Order with customer and line details, for admin viewing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: String,
    pub user_email: String,
    pub department_name: Option<String>,
    pub items: Vec<OrderItemDetail>,
}
