//! Department Repository

use super::{OptionExt, RepoResult};
use shared::models::{Department, DepartmentCreate, DepartmentUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department WHERE is_active = 1 ORDER BY name");
    let departments = sqlx::query_as::<_, Department>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(departments)
}

pub async fn find_all_including_inactive(pool: &SqlitePool) -> RepoResult<Vec<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department ORDER BY name");
    let departments = sqlx::query_as::<_, Department>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(departments)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department WHERE id = ?");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(department)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department WHERE name = ? LIMIT 1");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(department)
}

pub async fn create(pool: &SqlitePool, data: &DepartmentCreate) -> RepoResult<Department> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO department (name, description, is_active, created_at, updated_at) VALUES (?, ?, 1, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("Department {id}"))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &DepartmentUpdate) -> RepoResult<Department> {
    let rows = sqlx::query(
        "UPDATE department SET name = COALESCE(?1, name), description = COALESCE(?2, description), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(super::RepoError::NotFound(format!("Department {id}")));
    }
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("Department {id}"))
}

/// Soft delete: clear `is_active`, keep the row for referencing users
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE department SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM department WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
