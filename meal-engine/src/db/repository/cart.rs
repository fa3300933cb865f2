//! Cart Repository

use super::RepoResult;
use crate::order_money::{from_cents, line_subtotal};
use shared::models::{CartItem, CartLine};
use shared::util::now_millis;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, user_id, dish_id, quantity, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CartLineRow {
    cart_item_id: i64,
    dish_id: i64,
    dish_name: String,
    price_cents: i64,
    quantity: i64,
    stock_quantity: i64,
    is_available: bool,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        let unit_price = from_cents(row.price_cents);
        CartLine {
            cart_item_id: row.cart_item_id,
            dish_id: row.dish_id,
            dish_name: row.dish_name,
            unit_price,
            quantity: row.quantity,
            line_total: line_subtotal(unit_price, row.quantity),
            stock_quantity: row.stock_quantity,
            is_available: row.is_available,
        }
    }
}

/// All cart rows of a user, oldest first (pool or open transaction)
pub async fn find_by_user<'e, E>(executor: E, user_id: i64) -> RepoResult<Vec<CartItem>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {COLUMNS} FROM cart_item WHERE user_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CartItem>> {
    let sql = format!("SELECT {COLUMNS} FROM cart_item WHERE id = ?");
    let item = sqlx::query_as::<_, CartItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn find_by_user_and_dish(
    pool: &SqlitePool,
    user_id: i64,
    dish_id: i64,
) -> RepoResult<Option<CartItem>> {
    let sql = format!("SELECT {COLUMNS} FROM cart_item WHERE user_id = ? AND dish_id = ?");
    let item = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .bind(dish_id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Cart rows joined with the current state of their dishes
pub async fn find_lines(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
        "SELECT c.id AS cart_item_id, c.dish_id, d.name AS dish_name, d.price_cents, c.quantity, \
         d.stock_quantity, d.is_available \
         FROM cart_item c JOIN dish d ON d.id = c.dish_id \
         WHERE c.user_id = ? ORDER BY c.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CartLine::from).collect())
}

/// Insert a row or add to the existing (user, dish) row
pub async fn add_quantity(
    pool: &SqlitePool,
    user_id: i64,
    dish_id: i64,
    quantity: i64,
) -> RepoResult<CartItem> {
    let now = now_millis();
    let sql = format!(
        "INSERT INTO cart_item (user_id, dish_id, quantity, created_at, updated_at) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT (user_id, dish_id) DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at \
         RETURNING {COLUMNS}"
    );
    let item = sqlx::query_as::<_, CartItem>(&sql)
        .bind(user_id)
        .bind(dish_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(item)
}

/// Replace the quantity of a row owned by `user_id`
pub async fn set_quantity(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    quantity: i64,
) -> RepoResult<Option<CartItem>> {
    let sql = format!(
        "UPDATE cart_item SET quantity = ?, updated_at = ? WHERE id = ? AND user_id = ? RETURNING {COLUMNS}"
    );
    let item = sqlx::query_as::<_, CartItem>(&sql)
        .bind(quantity)
        .bind(now_millis())
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Delete a row owned by `user_id`
pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete every row of a user (pool or open transaction)
pub async fn clear<'e, E>(executor: E, user_id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}

/// Total units in the cart
pub async fn count_units(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let units = sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(units)
}
