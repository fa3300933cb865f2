//! Order Repository
//!
//! Orders and their items are only inserted inside the placement
//! transaction; afterwards only status, remarks and pickup time change.

use super::{RepoError, RepoResult};
use crate::order_money::from_cents;
use shared::models::{DeliveryType, Order, OrderItem, OrderItemDetail, OrderStatus, OrderUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, user_id, order_date, pickup_time, delivery_type, status, total_amount_cents, remarks, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    order_date: i64,
    pickup_time: i64,
    delivery_type: DeliveryType,
    status: OrderStatus,
    total_amount_cents: i64,
    remarks: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            user_id: row.user_id,
            order_date: row.order_date,
            pickup_time: row.pickup_time,
            delivery_type: row.delivery_type,
            status: row.status,
            total_amount: from_cents(row.total_amount_cents),
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    dish_id: i64,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
    dish_name: String,
}

impl From<OrderItemRow> for OrderItemDetail {
    fn from(row: OrderItemRow) -> Self {
        OrderItemDetail {
            item: OrderItem {
                id: row.id,
                order_id: row.order_id,
                dish_id: row.dish_id,
                quantity: row.quantity,
                unit_price: from_cents(row.unit_price_cents),
                subtotal: from_cents(row.subtotal_cents),
            },
            dish_name: row.dish_name,
        }
    }
}

/// Who placed an order, for detail views
#[derive(Debug, sqlx::FromRow)]
pub struct OrderOwner {
    pub user_name: String,
    pub user_email: String,
    pub department_name: Option<String>,
}

/// Insert payload for the order header; money in cents
pub struct NewOrder<'a> {
    pub user_id: i64,
    pub order_date: i64,
    pub pickup_time: i64,
    pub delivery_type: DeliveryType,
    pub total_amount_cents: i64,
    pub remarks: Option<&'a str>,
}

/// Insert payload for one order line; money in cents
pub struct NewOrderItem {
    pub dish_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

// ── Transactional writes ────────────────────────────────────────────

pub async fn insert_order(conn: &mut SqliteConnection, data: &NewOrder<'_>) -> RepoResult<i64> {
    let id = sqlx::query_scalar(
        "INSERT INTO meal_order (user_id, order_date, pickup_time, delivery_type, status, total_amount_cents, remarks, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'pending', ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.user_id)
    .bind(data.order_date)
    .bind(data.pickup_time)
    .bind(data.delivery_type)
    .bind(data.total_amount_cents)
    .bind(data.remarks)
    .bind(data.order_date)
    .bind(data.order_date)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &NewOrderItem,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar(
        "INSERT INTO order_item (order_id, dish_id, quantity, unit_price_cents, subtotal_cents) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(item.dish_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.subtotal_cents)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

// ── Reads ───────────────────────────────────────────────────────────

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {COLUMNS} FROM meal_order WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Order::from))
}

/// All orders, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM meal_order ORDER BY order_date DESC, id DESC");
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

/// Orders of one user, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM meal_order WHERE user_id = ? ORDER BY order_date DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

/// Orders in one status, newest first
pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM meal_order WHERE status = ? ORDER BY order_date DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

/// Items of an order with dish names (hidden dishes included)
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT i.id, i.order_id, i.dish_id, i.quantity, i.unit_price_cents, i.subtotal_cents, d.name AS dish_name \
         FROM order_item i JOIN dish d ON d.id = i.dish_id \
         WHERE i.order_id = ? ORDER BY i.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(OrderItemDetail::from).collect())
}

pub async fn find_owner(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<OrderOwner>> {
    let owner = sqlx::query_as::<_, OrderOwner>(
        "SELECT u.name AS user_name, u.email AS user_email, dep.name AS department_name \
         FROM meal_order o JOIN user u ON u.id = o.user_id \
         LEFT JOIN department dep ON dep.id = u.department_id \
         WHERE o.id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(owner)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM meal_order")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ── Bookkeeping updates ─────────────────────────────────────────────

/// Overwrite the status; returns the previous one
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
) -> RepoResult<OrderStatus> {
    let mut tx = pool.begin().await?;
    let previous: OrderStatus = sqlx::query_scalar("SELECT status FROM meal_order WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))?;
    sqlx::query("UPDATE meal_order SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(previous)
}

/// Move `id` from `from` to `to` only if it still belongs to `user_id` and is in `from`
pub async fn transition_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE meal_order SET status = ?, updated_at = ? WHERE id = ? AND user_id = ? AND status = ?",
    )
    .bind(to)
    .bind(now_millis())
    .bind(id)
    .bind(user_id)
    .bind(from)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_details(pool: &SqlitePool, id: i64, data: &OrderUpdate) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE meal_order SET pickup_time = COALESCE(?1, pickup_time), remarks = COALESCE(?2, remarks), \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.pickup_time)
    .bind(&data.remarks)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
