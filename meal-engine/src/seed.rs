//! Demo data
//!
//! Seeds departments, an administrator, a few regular accounts and a menu
//! into an empty database. Existing accounts mean the database is in use
//! and nothing is touched.

use crate::core::EngineState;
use crate::db::repository::user;
use crate::utils::AppResult;
use rust_decimal::Decimal;
use shared::models::{DepartmentCreate, DishCreate, UserCreate, UserRole};

/// Demo administrator login
pub const ADMIN_EMAIL: &str = "admin@company.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Password of every demo regular account
pub const DEMO_PASSWORD: &str = "password123";

const DEPARTMENTS: &[(&str, &str)] = &[
    ("Engineering", "Software development and IT"),
    ("Marketing", "Marketing and communications"),
    ("Sales", "Sales and customer relations"),
    ("HR", "Human resources"),
    ("Finance", "Financial operations"),
];

// (name, email, phone, department index)
const USERS: &[(&str, &str, &str, usize)] = &[
    ("John Doe", "john@company.com", "555-0101", 0),
    ("Jane Smith", "jane@company.com", "555-0102", 1),
    ("Mike Johnson", "mike@company.com", "555-0103", 2),
    ("Sarah Wilson", "sarah@company.com", "555-0104", 3),
];

// (name, price in cents, description, category, stock)
const DISHES: &[(&str, i64, &str, &str, i64)] = &[
    ("Pizza Margherita", 1599, "Classic pizza with tomato sauce, mozzarella cheese, and fresh basil", "Pizza", 20),
    ("Pepperoni Pizza", 1799, "Delicious pizza topped with pepperoni and mozzarella cheese", "Pizza", 15),
    ("Vegetarian Pizza", 1699, "Fresh vegetables including bell peppers, mushrooms, onions, and olives", "Pizza", 12),
    ("Classic Cheeseburger", 1299, "Juicy beef patty with cheese, lettuce, tomato, and pickles", "Burger", 25),
    ("Chicken Burger", 1199, "Grilled chicken breast with mayo, lettuce, and tomato", "Burger", 20),
    ("Veggie Burger", 1099, "Plant-based patty with avocado, sprouts, and special sauce", "Burger", 15),
    ("Spaghetti Carbonara", 1499, "Creamy pasta with eggs, cheese, pancetta, and black pepper", "Pasta", 18),
    ("Penne Arrabbiata", 1399, "Spicy tomato sauce with garlic, red chilies, and herbs", "Pasta", 22),
    ("Fettuccine Alfredo", 1599, "Rich and creamy white sauce with parmesan cheese", "Pasta", 16),
    ("Caesar Salad", 999, "Romaine lettuce with parmesan, croutons, and Caesar dressing", "Salad", 30),
    ("Greek Salad", 1099, "Mixed greens with feta cheese, olives, tomatoes, and olive oil", "Salad", 25),
    ("Quinoa Power Bowl", 1299, "Quinoa with roasted vegetables, chickpeas, and tahini dressing", "Salad", 20),
    ("Chocolate Brownie", 699, "Rich chocolate brownie served warm with vanilla ice cream", "Dessert", 35),
    ("Tiramisu", 799, "Classic Italian dessert with coffee-soaked ladyfingers and mascarpone", "Dessert", 15),
    ("Cheesecake", 899, "New York style cheesecake with berry compote", "Dessert", 20),
    ("Fresh Orange Juice", 499, "Freshly squeezed orange juice", "Beverage", 50),
    ("Iced Coffee", 399, "Cold brew coffee served over ice", "Beverage", 40),
    ("Smoothie Bowl", 899, "Mixed berry smoothie topped with granola and fresh fruit", "Beverage", 25),
];

/// What a seeding run created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub departments: usize,
    pub users: usize,
    pub dishes: usize,
}

/// Seed demo data unless any account already exists
///
/// Returns `None` when seeding was skipped.
pub async fn seed_demo_data(state: &EngineState) -> AppResult<Option<SeedReport>> {
    if user::count(&state.pool).await? > 0 {
        tracing::info!("Users already present, skipping demo data");
        return Ok(None);
    }

    let mut report = SeedReport::default();

    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for (name, description) in DEPARTMENTS {
        let department = state
            .catalog
            .create_department(DepartmentCreate {
                name: (*name).into(),
                description: Some((*description).into()),
            })
            .await?;
        department_ids.push(department.id);
        report.departments += 1;
    }

    // Accounts always register as regular; the admin is elevated afterwards
    let admin = state
        .auth
        .register(UserCreate {
            name: "Admin User".into(),
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
            phone: "555-0001".into(),
            department_id: department_ids.first().copied(),
        })
        .await?;
    state.auth.set_role(admin.id, UserRole::Admin).await?;
    report.users += 1;

    for (name, email, phone, department) in USERS {
        state
            .auth
            .register(UserCreate {
                name: (*name).into(),
                email: (*email).into(),
                password: DEMO_PASSWORD.into(),
                phone: (*phone).into(),
                department_id: department_ids.get(*department).copied(),
            })
            .await?;
        report.users += 1;
    }

    for (name, price_cents, description, category, stock) in DISHES {
        state
            .catalog
            .create_dish(DishCreate {
                name: (*name).into(),
                price: Decimal::new(*price_cents, 2),
                description: (*description).into(),
                image_url: None,
                category: (*category).into(),
                stock_quantity: *stock,
            })
            .await?;
        report.dishes += 1;
    }

    tracing::info!(
        departments = report.departments,
        users = report.users,
        dishes = report.dishes,
        admin = ADMIN_EMAIL,
        "Demo data seeded"
    );
    Ok(Some(report))
}
