//! Cart Service
//!
//! Every mutation checks the resulting quantity against the dish's current
//! stock. The check is advisory: checkout re-validates against live stock.

use crate::db::repository::{cart, dish, user};
use crate::order_money::{sum_amounts, validate_quantity};
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;
use shared::models::{CartItem, CartLine, Dish};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct CartService {
    pool: SqlitePool,
}

impl CartService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add `quantity` of a dish, merging into an existing line for the same dish
    pub async fn add(&self, user_id: i64, dish_id: i64, quantity: i64) -> AppResult<CartItem> {
        validate_quantity(quantity)?;
        self.ensure_user(user_id).await?;
        let dish = self.sellable_dish(dish_id).await?;

        let existing = cart::find_by_user_and_dish(&self.pool, user_id, dish_id)
            .await?
            .map(|item| item.quantity)
            .unwrap_or(0);
        let resulting = existing + quantity;
        validate_quantity(resulting)?;
        ensure_stock(&dish, resulting)?;

        let item = cart::add_quantity(&self.pool, user_id, dish_id, quantity).await?;
        tracing::debug!(user_id, dish_id, quantity = item.quantity, "Cart line added");
        Ok(item)
    }

    /// Replace the quantity of one of the user's lines (use `remove` to delete)
    pub async fn update(&self, user_id: i64, cart_item_id: i64, quantity: i64) -> AppResult<CartItem> {
        validate_quantity(quantity)?;
        self.ensure_user(user_id).await?;
        let item = self.owned_item(user_id, cart_item_id).await?;
        let dish = self.sellable_dish(item.dish_id).await?;
        ensure_stock(&dish, quantity)?;

        let updated = cart::set_quantity(&self.pool, cart_item_id, user_id, quantity)
            .await?
            .ok_or_else(|| cart_item_not_found(cart_item_id))?;
        tracing::debug!(user_id, cart_item_id, quantity, "Cart line updated");
        Ok(updated)
    }

    /// Delete one of the user's lines; unknown ids fail with `CartItemNotFound`
    pub async fn remove(&self, user_id: i64, cart_item_id: i64) -> AppResult<()> {
        if !cart::delete(&self.pool, cart_item_id, user_id).await? {
            return Err(cart_item_not_found(cart_item_id));
        }
        tracing::debug!(user_id, cart_item_id, "Cart line removed");
        Ok(())
    }

    /// Lines joined with current dish name, price and stock
    pub async fn items(&self, user_id: i64) -> AppResult<Vec<CartLine>> {
        Ok(cart::find_lines(&self.pool, user_id).await?)
    }

    /// Pre-purchase estimate at current catalog prices
    pub async fn total(&self, user_id: i64) -> AppResult<Decimal> {
        let lines = self.items(user_id).await?;
        Ok(sum_amounts(lines.into_iter().map(|line| line.line_total)))
    }

    /// Total units across all lines
    pub async fn count(&self, user_id: i64) -> AppResult<i64> {
        Ok(cart::count_units(&self.pool, user_id).await?)
    }

    /// Drop every line; returns how many were removed
    pub async fn clear(&self, user_id: i64) -> AppResult<u64> {
        let removed = cart::clear(&self.pool, user_id).await?;
        tracing::debug!(user_id, removed, "Cart cleared");
        Ok(removed)
    }

    /// Deactivated accounts are treated as unknown
    async fn ensure_user(&self, user_id: i64) -> AppResult<()> {
        match user::find_by_id(&self.pool, user_id).await? {
            Some(found) if found.is_active => Ok(()),
            _ => Err(AppError::with_message(
                ErrorCode::UserNotFound,
                format!("User {user_id} not found"),
            )),
        }
    }

    async fn sellable_dish(&self, dish_id: i64) -> AppResult<Dish> {
        let dish = dish::find_by_id(&self.pool, dish_id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::DishNotFound, format!("Dish {dish_id} not found"))
                .with_detail("dish_id", dish_id)
        })?;
        if !dish.is_available {
            return Err(AppError::unavailable(dish_id));
        }
        Ok(dish)
    }

    async fn owned_item(&self, user_id: i64, cart_item_id: i64) -> AppResult<CartItem> {
        match cart::find_by_id(&self.pool, cart_item_id).await? {
            Some(item) if item.user_id == user_id => Ok(item),
            _ => Err(cart_item_not_found(cart_item_id)),
        }
    }
}

fn ensure_stock(dish: &Dish, quantity: i64) -> AppResult<()> {
    if quantity > dish.stock_quantity {
        tracing::warn!(
            dish_id = dish.id,
            requested = quantity,
            available = dish.stock_quantity,
            "Cart quantity exceeds stock"
        );
        return Err(AppError::insufficient_stock(
            dish.id,
            quantity,
            dish.stock_quantity,
        ));
    }
    Ok(())
}

fn cart_item_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CartItemNotFound,
        format!("Cart item {id} not found"),
    )
    .with_detail("cart_item_id", id)
}
