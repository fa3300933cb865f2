//! User Repository

use super::{OptionExt, RepoError, RepoResult};
use shared::models::{User, UserRole, UserUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, email, password_hash, phone, role, department_id, is_active, created_at, updated_at";

/// Insert payload; the password is already hashed
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: &'a str,
    pub department_id: Option<i64>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user ORDER BY id");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Exact (case-sensitive) email lookup
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM user WHERE email = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// New accounts always start as `regular`
pub async fn create(pool: &SqlitePool, data: NewUser<'_>) -> RepoResult<User> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO user (name, email, password_hash, phone, role, department_id, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'regular', ?, 1, ?, ?) RETURNING id",
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.phone)
    .bind(data.department_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("User {id}"))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &UserUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE user SET name = COALESCE(?1, name), email = COALESCE(?2, email), phone = COALESCE(?3, phone), \
         department_id = COALESCE(?4, department_id), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(data.department_id)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("User {id}"))
}

pub async fn update_password_hash(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    Ok(())
}

pub async fn set_role(pool: &SqlitePool, id: i64, role: UserRole) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE user SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    find_by_id(pool, id)
        .await?
        .or_not_found(|| format!("User {id}"))
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE user SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
