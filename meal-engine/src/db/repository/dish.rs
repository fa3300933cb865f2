//! Dish Repository
//!
//! Stock only ever moves through conditional updates, so concurrent writers
//! cannot drive `stock_quantity` below zero.

use super::{OptionExt, RepoError, RepoResult};
use crate::order_money::from_cents;
use shared::models::{Dish, DishCreate, DishUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, name, price_cents, description, image_url, category, stock_quantity, is_available, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DishRow {
    id: i64,
    name: String,
    price_cents: i64,
    description: String,
    image_url: Option<String>,
    category: String,
    stock_quantity: i64,
    is_available: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            name: row.name,
            price: from_cents(row.price_cents),
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            stock_quantity: row.stock_quantity,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn fetch_list(pool: &SqlitePool, sql: &str, bind: Option<&str>) -> RepoResult<Vec<Dish>> {
    let mut query = sqlx::query_as::<_, DishRow>(sql);
    if let Some(value) = bind {
        query = query.bind(value);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Dish::from).collect())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Dish>> {
    let sql = format!("SELECT {COLUMNS} FROM dish ORDER BY category, name");
    fetch_list(pool, &sql, None).await
}

pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<Dish>> {
    let sql = format!("SELECT {COLUMNS} FROM dish WHERE is_available = 1 ORDER BY category, name");
    fetch_list(pool, &sql, None).await
}

/// Available dishes in one category
pub async fn find_by_category(pool: &SqlitePool, category: &str) -> RepoResult<Vec<Dish>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM dish WHERE is_available = 1 AND category = ? ORDER BY name"
    );
    fetch_list(pool, &sql, Some(category)).await
}

/// Distinct categories of available dishes
pub async fn find_categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let categories = sqlx::query_scalar(
        "SELECT DISTINCT category FROM dish WHERE is_available = 1 ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Lookup by id regardless of availability (pool or open transaction)
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Dish>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {COLUMNS} FROM dish WHERE id = ?");
    let row = sqlx::query_as::<_, DishRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Dish::from))
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM dish")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: &DishCreate, price_cents: i64) -> RepoResult<Dish> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dish (name, price_cents, description, image_url, category, stock_quantity, is_available, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(price_cents)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(&data.category)
    .bind(data.stock_quantity)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("Dish {id}"))
}

/// Partial update; `price_cents` is the already-validated `data.price`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &DishUpdate,
    price_cents: Option<i64>,
) -> RepoResult<Dish> {
    let rows = sqlx::query(
        "UPDATE dish SET name = COALESCE(?1, name), price_cents = COALESCE(?2, price_cents), \
         description = COALESCE(?3, description), image_url = COALESCE(?4, image_url), \
         category = COALESCE(?5, category), stock_quantity = COALESCE(?6, stock_quantity), \
         is_available = COALESCE(?7, is_available), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(price_cents)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(&data.category)
    .bind(data.stock_quantity)
    .bind(data.is_available)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id}")));
    }
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("Dish {id}"))
}

/// Soft delete: hide from the menu, keep the row for order history
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE dish SET is_available = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Add `delta` (may be negative) to the stock unless the result would be negative
///
/// Returns the new stock level, or `None` when the dish is missing or the
/// result would fall outside `0..=max_stock`. `delta` must itself lie within
/// `-max_stock..=max_stock` so the sum stays an INTEGER in SQLite.
pub async fn adjust_stock(
    pool: &SqlitePool,
    id: i64,
    delta: i64,
    max_stock: i64,
) -> RepoResult<Option<i64>> {
    let stock = sqlx::query_scalar(
        "UPDATE dish SET stock_quantity = stock_quantity + ?1, updated_at = ?2 \
         WHERE id = ?3 AND stock_quantity + ?1 BETWEEN 0 AND ?4 \
         RETURNING stock_quantity",
    )
    .bind(delta)
    .bind(now_millis())
    .bind(id)
    .bind(max_stock)
    .fetch_optional(pool)
    .await?;
    Ok(stock)
}

/// Take `quantity` units from an available dish inside an order transaction
///
/// Returns `false` when the dish is hidden or holds fewer than `quantity`
/// units at the moment of the write.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE dish SET stock_quantity = stock_quantity - ?1, updated_at = ?2 \
         WHERE id = ?3 AND is_available = 1 AND stock_quantity >= ?1",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}
