//! End-to-end flows through `EngineState` on a file database

use meal_engine::{Argon2Hasher, Config, DbService, EngineState, ErrorCode, ErrorKind, seed};
use rust_decimal_macros::dec;
use shared::models::{DishCreate, OrderStatus, PlaceOrder, UserCreate, UserRole};
use shared::util::now_millis;
use std::sync::Arc;

async fn engine(dir: &tempfile::TempDir) -> EngineState {
    let path = dir.path().join("meal.db");
    let path = path.to_str().unwrap();
    let db = DbService::new(path, 2).await.unwrap();
    let hasher = Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap());
    EngineState::new(Config::for_database(path), db.pool, hasher)
}

fn user(email: &str, password: &str) -> UserCreate {
    UserCreate {
        name: "Test User".into(),
        email: email.into(),
        password: password.into(),
        phone: "555-0100".into(),
        department_id: None,
    }
}

fn checkout() -> PlaceOrder {
    PlaceOrder {
        pickup_time: now_millis() + 30 * 60 * 1000,
        remarks: Some("Leave at reception".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_pizza_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let state = engine(&dir).await;

    let registered = state
        .auth
        .register(user("u@company.com", "password123"))
        .await
        .unwrap();
    let u = state
        .auth
        .authenticate("u@company.com", "password123")
        .await
        .unwrap();
    assert_eq!(u.id, registered.id);

    let pizza = state
        .catalog
        .create_dish(DishCreate {
            name: "Pizza".into(),
            price: dec!(15.99),
            description: "Tomato and mozzarella".into(),
            image_url: None,
            category: "Pizza".into(),
            stock_quantity: 10,
        })
        .await
        .unwrap();

    state.carts.add(u.id, pizza.id, 2).await.unwrap();
    assert_eq!(state.carts.total(u.id).await.unwrap(), dec!(31.98));

    let placed = state.orders.place_order(u.id, checkout()).await.unwrap();

    assert_eq!(placed.order.total_amount, dec!(31.98));
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].item.unit_price, dec!(15.99));
    assert_eq!(placed.items[0].item.quantity, 2);
    assert_eq!(placed.items[0].item.subtotal, dec!(31.98));

    assert_eq!(state.catalog.get_dish(pizza.id).await.unwrap().stock_quantity, 8);
    assert!(state.carts.items(u.id).await.unwrap().is_empty());

    // The order survives a reopen of the database file
    let reopened = engine(&dir).await;
    let detail = reopened.orders.order_detail(placed.order.id).await.unwrap();
    assert_eq!(detail.order.total_amount.to_string(), "31.98");
    assert_eq!(detail.user_email, "u@company.com");
}

#[tokio::test]
async fn test_registration_and_authentication_properties() {
    let dir = tempfile::tempdir().unwrap();
    let state = engine(&dir).await;

    let first = state
        .auth
        .register(user("dup@company.com", "password123"))
        .await
        .unwrap();
    let err = state
        .auth
        .register(user("dup@company.com", "another-password"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(state.auth.get_by_id(first.id).await.unwrap().email, "dup@company.com");

    let attempts = [
        ("dup@company.com", "password123", true),
        ("dup@company.com", "another-password", false),
        ("dup@company.com", "", false),
        ("DUP@company.com", "password123", false),
        ("ghost@company.com", "password123", false),
    ];
    for (email, password, expected) in attempts {
        let result = state.auth.authenticate(email, password).await;
        assert_eq!(result.is_ok(), expected, "{email} / {password}");
        if let Err(err) = result {
            assert_eq!(err.code, ErrorCode::InvalidCredentials);
        }
    }
}

#[tokio::test]
async fn test_admin_status_flow_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let state = engine(&dir).await;
    seed::seed_demo_data(&state).await.unwrap().unwrap();

    let admin = state
        .auth
        .authenticate(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)
        .await
        .unwrap();
    assert_eq!(admin.role, UserRole::Admin);
    let john = state
        .auth
        .authenticate("john@company.com", seed::DEMO_PASSWORD)
        .await
        .unwrap();
    assert!(state.auth.require_admin(john.id).await.is_err());

    let menu = state.catalog.list_dishes_by_category("Pasta").await.unwrap();
    let carbonara = menu
        .iter()
        .find(|d| d.name == "Spaghetti Carbonara")
        .unwrap();
    state.carts.add(john.id, carbonara.id, 3).await.unwrap();
    let placed = state.orders.place_order(john.id, checkout()).await.unwrap();
    assert_eq!(placed.order.total_amount, dec!(44.97));
    assert_eq!(placed.department_name.as_deref(), Some("Engineering"));

    state.auth.require_admin(admin.id).await.unwrap();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        let order = state
            .orders
            .update_status(placed.order.id, status)
            .await
            .unwrap();
        assert_eq!(order.status, status);
    }
    assert!(state
        .orders
        .list_orders_by_status(OrderStatus::Completed)
        .await
        .unwrap()
        .iter()
        .any(|o| o.id == placed.order.id));

    let summary = state.reports.summary().await.unwrap();
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.active_departments, 5);
    assert_eq!(summary.revenue, dec!(44.97));

    let departments = state.reports.department_summaries().await.unwrap();
    assert_eq!(departments[0].department_name, "Engineering");
    assert_eq!(departments[0].total_quantity, 3);
}
