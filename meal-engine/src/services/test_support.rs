//! Fixtures shared by service tests

use crate::db::repository::{dish, user};
use crate::order_money::to_cents;
use rust_decimal::Decimal;
use shared::models::DishCreate;
use sqlx::SqlitePool;

/// Insert a regular user directly (no hashing cost)
pub async fn new_user(pool: &SqlitePool, email: &str) -> i64 {
    user::create(
        pool,
        user::NewUser {
            name: "John Smith",
            email,
            password_hash: "$argon2id$placeholder",
            phone: "123-456-7891",
            department_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Insert an available dish in the "Pizza" category
pub async fn new_dish(pool: &SqlitePool, name: &str, price: Decimal, stock: i64) -> i64 {
    let data = DishCreate {
        name: name.into(),
        price,
        description: String::new(),
        image_url: None,
        category: "Pizza".into(),
        stock_quantity: stock,
    };
    dish::create(pool, &data, to_cents(price).unwrap())
        .await
        .unwrap()
        .id
}

/// Current stock of a dish
pub async fn stock_of(pool: &SqlitePool, dish_id: i64) -> i64 {
    dish::find_by_id(pool, dish_id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}
