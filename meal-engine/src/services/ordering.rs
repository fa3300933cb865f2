//! Order Service - checkout and order bookkeeping
//!
//! `place_order` turns a user's cart into an immutable order in one SQLite
//! transaction: re-validate every line against live stock, snapshot unit
//! prices, write the order and its items, decrement stock, clear the cart.
//! Any failure rolls everything back.
//!
//! Stock is taken with `UPDATE ... WHERE stock_quantity >= ?`, so two
//! checkouts racing for the last unit cannot both commit. When SQLite
//! reports the write lock as busy the whole attempt is retried and the
//! loser re-validates against the winner's committed stock.

use crate::db::repository::order::{NewOrder, NewOrderItem};
use crate::db::repository::{RepoError, cart, dish, order, user};
use crate::order_money::{line_subtotal, sum_amounts, to_cents};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderDetail, OrderStatus, OrderUpdate, PlaceOrder};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};
use std::time::Duration;

/// Attempts per checkout when SQLite reports the database as busy
const MAX_PLACE_ATTEMPTS: u32 = 5;

/// Base delay between busy retries (multiplied by the attempt number)
const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Why a checkout attempt stopped
enum PlaceError {
    /// Business rule violation; final
    Rejected(AppError),
    /// Storage failure; retried when busy
    Storage(RepoError),
}

impl From<AppError> for PlaceError {
    fn from(err: AppError) -> Self {
        PlaceError::Rejected(err)
    }
}

impl From<RepoError> for PlaceError {
    fn from(err: RepoError) -> Self {
        PlaceError::Storage(err)
    }
}

impl From<sqlx::Error> for PlaceError {
    fn from(err: sqlx::Error) -> Self {
        PlaceError::Storage(err.into())
    }
}

impl From<PlaceError> for AppError {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::Rejected(e) => e,
            PlaceError::Storage(e) => e.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check out the user's cart
    pub async fn place_order(&self, user_id: i64, data: PlaceOrder) -> AppResult<OrderDetail> {
        validate_payload(&data)?;
        match user::find_by_id(&self.pool, user_id).await? {
            Some(found) if found.is_active => {}
            _ => {
                return Err(AppError::with_message(
                    ErrorCode::UserNotFound,
                    format!("User {user_id} not found"),
                ));
            }
        }
        let order_date = now_millis();
        if data.pickup_time < order_date {
            return Err(invalid_pickup_time(data.pickup_time, order_date));
        }

        let mut attempt = 1;
        let order_id = loop {
            match self.try_place_order(user_id, &data, order_date).await {
                Ok(id) => break id,
                Err(PlaceError::Storage(e)) if e.is_busy() && attempt < MAX_PLACE_ATTEMPTS => {
                    tracing::warn!(user_id, attempt, error = %e, "Checkout hit a busy database, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(PlaceError::Rejected(e)) => {
                    tracing::warn!(user_id, code = %e.code, reason = %e.message, "Checkout rejected");
                    return Err(e);
                }
                Err(e) => return Err(e.into()),
            }
        };

        let detail = self.order_detail(order_id).await?;
        tracing::info!(
            order_id,
            user_id,
            total = %detail.order.total_amount,
            items = detail.items.len(),
            "Order placed"
        );
        Ok(detail)
    }

    /// One transactional checkout attempt; rolls back on any error
    async fn try_place_order(
        &self,
        user_id: i64,
        data: &PlaceOrder,
        order_date: i64,
    ) -> Result<i64, PlaceError> {
        let mut tx = self.pool.begin().await?;
        match write_order(&mut *tx, user_id, data, order_date).await {
            Ok(order_id) => {
                tx.commit().await?;
                Ok(order_id)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(user_id, error = %rollback, "Checkout rollback failed");
                }
                Err(e)
            }
        }
    }

    /// All orders, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        Ok(order::find_all(&self.pool).await?)
    }

    /// Orders of one user, newest first
    pub async fn list_user_orders(&self, user_id: i64) -> AppResult<Vec<Order>> {
        Ok(order::find_by_user(&self.pool, user_id).await?)
    }

    pub async fn list_orders_by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        Ok(order::find_by_status(&self.pool, status).await?)
    }

    pub async fn get_order(&self, id: i64) -> AppResult<Order> {
        order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// Order with its items, owner and owner's department
    pub async fn order_detail(&self, id: i64) -> AppResult<OrderDetail> {
        let order = self.get_order(id).await?;
        let owner = order::find_owner(&self.pool, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;
        let items = order::find_items(&self.pool, id).await?;
        Ok(OrderDetail {
            order,
            user_name: owner.user_name,
            user_email: owner.user_email,
            department_name: owner.department_name,
            items,
        })
    }

    /// Administrative status overwrite
    ///
    /// Any status may be written; jumps outside the lifecycle are logged.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> AppResult<Order> {
        let previous = order::update_status(&self.pool, id, status)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => order_not_found(id),
                other => other.into(),
            })?;
        if previous != status && !previous.can_transition_to(status) {
            tracing::warn!(order_id = id, from = %previous, to = %status, "Order status jumped outside lifecycle");
        } else {
            tracing::info!(order_id = id, from = %previous, to = %status, "Order status updated");
        }
        self.get_order(id).await
    }

    /// Edit remarks and pickup time; items and amounts never change
    pub async fn update_details(&self, id: i64, data: OrderUpdate) -> AppResult<Order> {
        validate_payload(&data)?;
        let current = self.get_order(id).await?;
        if let Some(pickup_time) = data.pickup_time
            && pickup_time < current.order_date
        {
            return Err(invalid_pickup_time(pickup_time, current.order_date));
        }
        if !order::update_details(&self.pool, id, &data).await? {
            return Err(order_not_found(id));
        }
        tracing::info!(order_id = id, "Order details updated");
        self.get_order(id).await
    }

    /// Owner cancels their own pending order; stock is not restored
    pub async fn cancel_order(&self, user_id: i64, order_id: i64) -> AppResult<Order> {
        let current = self.get_order(order_id).await?;
        if current.user_id != user_id {
            return Err(order_not_found(order_id));
        }
        if current.status != OrderStatus::Pending {
            return Err(cannot_cancel(order_id, current.status));
        }
        let cancelled = order::transition_owned(
            &self.pool,
            order_id,
            user_id,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
        )
        .await?;
        if !cancelled {
            let status = self.get_order(order_id).await?.status;
            return Err(cannot_cancel(order_id, status));
        }
        tracing::info!(order_id, user_id, "Order cancelled by owner");
        self.get_order(order_id).await
    }
}

/// Checkout body; runs inside the caller's transaction
async fn write_order(
    conn: &mut SqliteConnection,
    user_id: i64,
    data: &PlaceOrder,
    order_date: i64,
) -> Result<i64, PlaceError> {
    let lines = cart::find_by_user(&mut *conn, user_id).await?;
    if lines.is_empty() {
        return Err(AppError::empty_cart().into());
    }

    // Re-validate against live stock and snapshot prices
    let mut items = Vec::with_capacity(lines.len());
    let mut subtotals = Vec::with_capacity(lines.len());
    for line in &lines {
        let dish = dish::find_by_id(&mut *conn, line.dish_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::DishNotFound,
                    format!("Dish {} not found", line.dish_id),
                )
            })?;
        if !dish.is_available {
            return Err(AppError::unavailable(dish.id).into());
        }
        if dish.stock_quantity < line.quantity {
            return Err(
                AppError::insufficient_stock(dish.id, line.quantity, dish.stock_quantity).into(),
            );
        }

        let subtotal = line_subtotal(dish.price, line.quantity);
        items.push(NewOrderItem {
            dish_id: dish.id,
            quantity: line.quantity,
            unit_price_cents: to_cents(dish.price)?,
            subtotal_cents: to_cents(subtotal)?,
        });
        subtotals.push(subtotal);
    }
    let total = sum_amounts(subtotals);

    let order_id = order::insert_order(
        &mut *conn,
        &NewOrder {
            user_id,
            order_date,
            pickup_time: data.pickup_time,
            delivery_type: data.delivery_type,
            total_amount_cents: to_cents(total)?,
            remarks: data.remarks.as_deref(),
        },
    )
    .await?;
    for item in &items {
        order::insert_item(&mut *conn, order_id, item).await?;
    }

    for item in &items {
        if !dish::decrement_stock(&mut *conn, item.dish_id, item.quantity).await? {
            let available = dish::find_by_id(&mut *conn, item.dish_id)
                .await?
                .map(|d| d.stock_quantity)
                .unwrap_or(0);
            return Err(AppError::insufficient_stock(item.dish_id, item.quantity, available).into());
        }
    }

    cart::clear(&mut *conn, user_id).await?;
    Ok(order_id)
}

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("order_id", id)
}

fn invalid_pickup_time(pickup_time: i64, order_date: i64) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidPickupTime,
        "Pickup time must not be before the order time",
    )
    .with_detail("pickup_time", pickup_time)
    .with_detail("order_date", order_date)
}

fn cannot_cancel(order_id: i64, status: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("Order {order_id} is {status} and can no longer be cancelled"),
    )
    .with_detail("status", status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::order_money::MAX_STOCK;
    use crate::services::CartService;
    use crate::services::test_support::{new_dish, new_user, stock_of};
    use crate::utils::ErrorKind;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use shared::models::DeliveryType;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    struct Fixture {
        orders: OrderService,
        carts: CartService,
        pool: SqlitePool,
        user_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let user_id = new_user(&db.pool, "john@company.com").await;
        Fixture {
            orders: OrderService::new(db.pool.clone()),
            carts: CartService::new(db.pool.clone()),
            pool: db.pool,
            user_id,
        }
    }

    fn pickup_in_an_hour() -> PlaceOrder {
        PlaceOrder {
            pickup_time: now_millis() + HOUR_MS,
            delivery_type: DeliveryType::Pickup,
            remarks: Some("No onions".into()),
        }
    }

    #[tokio::test]
    async fn test_place_order_end_to_end() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 2).await.unwrap();

        let detail = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();

        assert_eq!(detail.order.total_amount, dec!(31.98));
        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.order.remarks.as_deref(), Some("No onions"));
        assert_eq!(detail.items.len(), 1);
        let item = &detail.items[0];
        assert_eq!(item.dish_name, "Pizza");
        assert_eq!(item.item.unit_price, dec!(15.99));
        assert_eq!(item.item.quantity, 2);
        assert_eq!(item.item.subtotal, dec!(31.98));

        assert_eq!(stock_of(&f.pool, pizza).await, 8);
        assert!(f.carts.items(f.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_total_equals_sum_of_subtotals() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        let salad = new_dish(&f.pool, "Caesar Salad", dec!(0.10), 10).await;
        let soup = new_dish(&f.pool, "Soup", dec!(0.20), 10).await;
        f.carts.add(f.user_id, pizza, 3).await.unwrap();
        f.carts.add(f.user_id, salad, 1).await.unwrap();
        f.carts.add(f.user_id, soup, 1).await.unwrap();

        let detail = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();

        let pizza_line = detail.items.iter().find(|i| i.item.dish_id == pizza).unwrap();
        assert_eq!(pizza_line.item.subtotal, dec!(47.97));
        let sum: Decimal = detail.items.iter().map(|i| i.item.subtotal).sum();
        assert_eq!(sum, detail.order.total_amount);
        assert_eq!(detail.order.total_amount.to_string(), "48.27");
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let f = fixture().await;
        let err = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.kind(), ErrorKind::EmptyCart);
        assert!(f.orders.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_checkout_changes_nothing() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        let salad = new_dish(&f.pool, "Caesar Salad", dec!(9.99), 5).await;
        f.carts.add(f.user_id, pizza, 2).await.unwrap();
        f.carts.add(f.user_id, salad, 3).await.unwrap();

        // Stock consumed elsewhere between add-to-cart and checkout
        dish::adjust_stock(&f.pool, salad, -4, MAX_STOCK).await.unwrap();

        let err = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);

        assert_eq!(stock_of(&f.pool, pizza).await, 10);
        assert_eq!(stock_of(&f.pool, salad).await, 1);
        assert!(f.orders.list_orders().await.unwrap().is_empty());
        assert_eq!(f.carts.items(f.user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_hidden_dish_blocks_checkout() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 1).await.unwrap();
        dish::soft_delete(&f.pool, pizza).await.unwrap();

        let err = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(stock_of(&f.pool, pizza).await, 10);
        assert_eq!(f.carts.count(f.user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_fault_rolls_back_every_write() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 2).await.unwrap();

        // Fail the last step (cart clear), after order, items and stock were written
        sqlx::query(
            "CREATE TRIGGER fail_cart_clear BEFORE DELETE ON cart_item \
             BEGIN SELECT RAISE(ABORT, 'simulated storage fault'); END",
        )
        .execute(&f.pool)
        .await
        .unwrap();

        let err = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!err.is_recoverable());

        assert_eq!(stock_of(&f.pool, pizza).await, 10);
        assert!(f.orders.list_orders().await.unwrap().is_empty());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(&f.pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
        assert_eq!(f.carts.count(f.user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unit_price_is_a_snapshot() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 1).await.unwrap();
        let detail = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();

        sqlx::query("UPDATE dish SET price_cents = 2599 WHERE id = ?")
            .bind(pizza)
            .execute(&f.pool)
            .await
            .unwrap();
        dish::soft_delete(&f.pool, pizza).await.unwrap();

        let again = f.orders.order_detail(detail.order.id).await.unwrap();
        assert_eq!(again.items[0].item.unit_price, dec!(15.99));
        assert_eq!(again.items[0].dish_name, "Pizza");
        assert_eq!(again.order.total_amount, dec!(15.99));
    }

    #[tokio::test]
    async fn test_pickup_time_before_order_is_rejected() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 1).await.unwrap();

        let err = f
            .orders
            .place_order(
                f.user_id,
                PlaceOrder {
                    pickup_time: now_millis() - HOUR_MS,
                    ..pickup_in_an_hour()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPickupTime);

        let err = f
            .orders
            .place_order(
                f.user_id,
                PlaceOrder {
                    remarks: Some("x".repeat(1001)),
                    ..pickup_in_an_hour()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(stock_of(&f.pool, pizza).await, 10);
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_order() {
        let f = fixture().await;
        let err = f
            .orders
            .place_order(4242, pickup_in_an_hour())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn test_update_status_overwrites_unconditionally() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 1).await.unwrap();
        let placed = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();
        let id = placed.order.id;

        let order = f.orders.update_status(id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);

        // Illegal jump is still applied
        let order = f.orders.update_status(id, OrderStatus::Pending).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        let order = f.orders.update_status(id, OrderStatus::Completed).await.unwrap();
        assert_eq!(order.status, OrderStatus::Completed);

        let err = f
            .orders
            .update_status(999, OrderStatus::Ready)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_update_details_only_touches_remarks_and_pickup() {
        let f = fixture().await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 1).await.unwrap();
        let placed = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();

        let new_pickup = placed.order.pickup_time + HOUR_MS;
        let order = f
            .orders
            .update_details(
                placed.order.id,
                OrderUpdate {
                    pickup_time: Some(new_pickup),
                    remarks: Some("Extra napkins".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(order.pickup_time, new_pickup);
        assert_eq!(order.remarks.as_deref(), Some("Extra napkins"));
        assert_eq!(order.total_amount, placed.order.total_amount);
        assert_eq!(order.status, placed.order.status);

        let err = f
            .orders
            .update_details(
                placed.order.id,
                OrderUpdate {
                    pickup_time: Some(placed.order.order_date - 1),
                    remarks: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPickupTime);
    }

    #[tokio::test]
    async fn test_cancel_order_rules() {
        let f = fixture().await;
        let other = new_user(&f.pool, "jane@company.com").await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;
        f.carts.add(f.user_id, pizza, 2).await.unwrap();
        let placed = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();
        let id = placed.order.id;

        let err = f.orders.cancel_order(other, id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        let order = f.orders.cancel_order(f.user_id, id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        // Stock is not restored by cancellation
        assert_eq!(stock_of(&f.pool, pizza).await, 8);

        let err = f.orders.cancel_order(f.user_id, id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    }

    #[tokio::test]
    async fn test_listing_orders() {
        let f = fixture().await;
        let other = new_user(&f.pool, "jane@company.com").await;
        let pizza = new_dish(&f.pool, "Pizza", dec!(15.99), 10).await;

        f.carts.add(f.user_id, pizza, 1).await.unwrap();
        let first = f
            .orders
            .place_order(f.user_id, pickup_in_an_hour())
            .await
            .unwrap();
        f.carts.add(other, pizza, 1).await.unwrap();
        f.orders
            .place_order(other, pickup_in_an_hour())
            .await
            .unwrap();
        f.orders
            .update_status(first.order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        assert_eq!(f.orders.list_orders().await.unwrap().len(), 2);
        let mine = f.orders.list_user_orders(f.user_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, first.order.id);
        let pending = f
            .orders
            .list_orders_by_status(OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].user_id, other);

        let detail = f.orders.order_detail(first.order.id).await.unwrap();
        assert_eq!(detail.user_email, "john@company.com");
        assert_eq!(detail.department_name, None);

        let err = f.orders.get_order(999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
