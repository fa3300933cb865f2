//! Report Repository
//!
//! Aggregations over non-cancelled orders.

use super::RepoResult;
use crate::order_money::from_cents;
use shared::models::{DepartmentOrderSummary, DishOrderSummary};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    total_orders: i64,
    total_quantity: i64,
    total_cents: i64,
}

/// Revenue in cents of every order that was not cancelled
pub async fn revenue_cents(pool: &SqlitePool) -> RepoResult<i64> {
    let cents = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount_cents), 0) FROM meal_order WHERE status != 'cancelled'",
    )
    .fetch_one(pool)
    .await?;
    Ok(cents)
}

/// Per-dish sales, best sellers first
pub async fn dish_summaries(pool: &SqlitePool) -> RepoResult<Vec<DishOrderSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT d.id, d.name, COUNT(DISTINCT o.id) AS total_orders, \
         SUM(i.quantity) AS total_quantity, SUM(i.subtotal_cents) AS total_cents \
         FROM order_item i \
         JOIN meal_order o ON o.id = i.order_id \
         JOIN dish d ON d.id = i.dish_id \
         WHERE o.status != 'cancelled' \
         GROUP BY d.id, d.name \
         ORDER BY total_quantity DESC, d.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| DishOrderSummary {
            dish_id: row.id,
            dish_name: row.name,
            total_orders: row.total_orders,
            total_quantity: row.total_quantity,
            total_amount: from_cents(row.total_cents),
        })
        .collect())
}

/// Per-department sales of users that belong to a department
pub async fn department_summaries(pool: &SqlitePool) -> RepoResult<Vec<DepartmentOrderSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT dep.id, dep.name, COUNT(DISTINCT o.id) AS total_orders, \
         SUM(i.quantity) AS total_quantity, SUM(i.subtotal_cents) AS total_cents \
         FROM order_item i \
         JOIN meal_order o ON o.id = i.order_id \
         JOIN user u ON u.id = o.user_id \
         JOIN department dep ON dep.id = u.department_id \
         WHERE o.status != 'cancelled' \
         GROUP BY dep.id, dep.name \
         ORDER BY total_cents DESC, dep.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|row| DepartmentOrderSummary {
            department_id: row.id,
            department_name: row.name,
            total_orders: row.total_orders,
            total_quantity: row.total_quantity,
            total_amount: from_cents(row.total_cents),
        })
        .collect())
}
