//! Catalog Service - departments and dishes
//!
//! Reference data with soft delete: departments are deactivated and dishes
//! hidden, never removed, so users and order history keep resolving.

use crate::db::repository::{RepoError, department, dish};
use crate::order_money::{MAX_STOCK, to_cents, validate_price, validate_stock};
use crate::utils::validation::{
    MAX_DEPARTMENT_NAME_LEN, MAX_DISH_NAME_LEN, validate_optional_required_text, validate_payload,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Department, DepartmentCreate, DepartmentUpdate, Dish, DishCreate, DishUpdate,
};
use sqlx::SqlitePool;

const MAX_CATEGORY_LEN: usize = 100;

#[derive(Clone, Debug)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Departments
    // =========================================================================

    pub async fn create_department(&self, data: DepartmentCreate) -> AppResult<Department> {
        validate_payload(&data)?;
        validate_required_text(&data.name, "name", MAX_DEPARTMENT_NAME_LEN)?;

        if department::find_by_name(&self.pool, &data.name).await?.is_some() {
            return Err(department_name_exists(&data.name));
        }
        let created = department::create(&self.pool, &data)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => department_name_exists(&data.name),
                other => other.into(),
            })?;
        tracing::info!(department_id = created.id, name = %created.name, "Department created");
        Ok(created)
    }

    /// Active departments
    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        Ok(department::find_all(&self.pool).await?)
    }

    /// Every department, deactivated ones included
    pub async fn list_all_departments(&self) -> AppResult<Vec<Department>> {
        Ok(department::find_all_including_inactive(&self.pool).await?)
    }

    pub async fn get_department(&self, id: i64) -> AppResult<Department> {
        department::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| department_not_found(id))
    }

    pub async fn update_department(&self, id: i64, data: DepartmentUpdate) -> AppResult<Department> {
        validate_payload(&data)?;
        validate_optional_required_text(&data.name, "name", MAX_DEPARTMENT_NAME_LEN)?;

        let current = self.get_department(id).await?;
        if let Some(name) = &data.name
            && name != &current.name
            && department::find_by_name(&self.pool, name).await?.is_some()
        {
            return Err(department_name_exists(name));
        }
        let updated = department::update(&self.pool, id, &data)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    department_name_exists(data.name.as_deref().unwrap_or_default())
                }
                RepoError::NotFound(_) => department_not_found(id),
                other => other.into(),
            })?;
        tracing::info!(department_id = id, "Department updated");
        Ok(updated)
    }

    /// Soft delete: the department stays referenced by its users
    pub async fn delete_department(&self, id: i64) -> AppResult<()> {
        if !department::soft_delete(&self.pool, id).await? {
            return Err(department_not_found(id));
        }
        tracing::info!(department_id = id, "Department deactivated");
        Ok(())
    }

    // =========================================================================
    // Dishes
    // =========================================================================

    pub async fn create_dish(&self, data: DishCreate) -> AppResult<Dish> {
        validate_payload(&data)?;
        validate_required_text(&data.name, "name", MAX_DISH_NAME_LEN)?;
        validate_required_text(&data.category, "category", MAX_CATEGORY_LEN)?;
        validate_price(data.price)?;
        validate_stock(data.stock_quantity)?;

        let price_cents = to_cents(data.price)?;
        let created = dish::create(&self.pool, &data, price_cents).await?;
        tracing::info!(
            dish_id = created.id,
            name = %created.name,
            price = %created.price,
            stock = created.stock_quantity,
            "Dish created"
        );
        Ok(created)
    }

    /// Every dish, hidden ones included
    pub async fn list_dishes(&self) -> AppResult<Vec<Dish>> {
        Ok(dish::find_all(&self.pool).await?)
    }

    /// Dishes shown on the menu
    pub async fn list_available_dishes(&self) -> AppResult<Vec<Dish>> {
        Ok(dish::find_available(&self.pool).await?)
    }

    pub async fn list_dishes_by_category(&self, category: &str) -> AppResult<Vec<Dish>> {
        Ok(dish::find_by_category(&self.pool, category).await?)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        Ok(dish::find_categories(&self.pool).await?)
    }

    pub async fn get_dish(&self, id: i64) -> AppResult<Dish> {
        dish::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| dish_not_found(id))
    }

    pub async fn update_dish(&self, id: i64, data: DishUpdate) -> AppResult<Dish> {
        validate_payload(&data)?;
        validate_optional_required_text(&data.name, "name", MAX_DISH_NAME_LEN)?;
        validate_optional_required_text(&data.category, "category", MAX_CATEGORY_LEN)?;
        let price_cents = match data.price {
            Some(price) => {
                validate_price(price)?;
                Some(to_cents(price)?)
            }
            None => None,
        };
        if let Some(stock) = data.stock_quantity {
            validate_stock(stock)?;
        }

        let updated = dish::update(&self.pool, id, &data, price_cents)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => dish_not_found(id),
                other => other.into(),
            })?;
        tracing::info!(dish_id = id, "Dish updated");
        Ok(updated)
    }

    /// Soft delete: hidden from the menu, still resolvable from orders
    pub async fn delete_dish(&self, id: i64) -> AppResult<()> {
        if !dish::soft_delete(&self.pool, id).await? {
            return Err(dish_not_found(id));
        }
        tracing::info!(dish_id = id, "Dish hidden");
        Ok(())
    }

    /// Add (or with a negative delta, remove) stock, keeping it within
    /// `0..=MAX_STOCK`
    pub async fn restock(&self, id: i64, delta: i64) -> AppResult<Dish> {
        if !(-MAX_STOCK..=MAX_STOCK).contains(&delta) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("stock adjustment must be within ±{MAX_STOCK}, got {delta}"),
            )
            .with_detail("dish_id", id));
        }

        match dish::adjust_stock(&self.pool, id, delta, MAX_STOCK).await? {
            Some(stock) => {
                tracing::info!(dish_id = id, delta, stock, "Dish stock adjusted");
                self.get_dish(id).await
            }
            None => {
                let current = self.get_dish(id).await?;
                tracing::warn!(
                    dish_id = id,
                    delta,
                    stock = current.stock_quantity,
                    "Stock adjustment rejected"
                );
                if delta > 0 {
                    Err(AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        format!(
                            "stock {} + {delta} exceeds maximum allowed ({MAX_STOCK})",
                            current.stock_quantity
                        ),
                    )
                    .with_detail("dish_id", id))
                } else {
                    Err(AppError::insufficient_stock(id, -delta, current.stock_quantity))
                }
            }
        }
    }
}

fn department_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::DepartmentNotFound,
        format!("Department {id} not found"),
    )
    .with_detail("department_id", id)
}

fn department_name_exists(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::DepartmentNameExists,
        format!("Department '{name}' already exists"),
    )
    .with_detail("name", name)
}

fn dish_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found"))
        .with_detail("dish_id", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::utils::ErrorKind;
    use rust_decimal_macros::dec;

    async fn service() -> CatalogService {
        let db = DbService::in_memory().await.unwrap();
        CatalogService::new(db.pool)
    }

    fn pizza() -> DishCreate {
        DishCreate {
            name: "Pizza Margherita".into(),
            price: dec!(15.99),
            description: "Classic pizza with tomato sauce and mozzarella".into(),
            image_url: None,
            category: "Pizza".into(),
            stock_quantity: 10,
        }
    }

    fn department(name: &str) -> DepartmentCreate {
        DepartmentCreate {
            name: name.into(),
            description: Some(format!("{name} Department")),
        }
    }

    #[tokio::test]
    async fn test_create_department_rejects_duplicate_name() {
        let catalog = service().await;
        let first = catalog.create_department(department("Engineering")).await.unwrap();
        assert!(first.is_active);

        let err = catalog
            .create_department(department("Engineering"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DepartmentNameExists);
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let all = catalog.list_all_departments().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description.as_deref(), Some("Engineering Department"));
    }

    #[tokio::test]
    async fn test_update_department_partial_and_rename_conflict() {
        let catalog = service().await;
        let eng = catalog.create_department(department("Engineering")).await.unwrap();
        catalog.create_department(department("Sales")).await.unwrap();

        let updated = catalog
            .update_department(
                eng.id,
                DepartmentUpdate {
                    description: Some("Builds things".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Engineering");
        assert_eq!(updated.description.as_deref(), Some("Builds things"));

        let err = catalog
            .update_department(
                eng.id,
                DepartmentUpdate {
                    name: Some("Sales".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DepartmentNameExists);

        let err = catalog
            .update_department(999, DepartmentUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DepartmentNotFound);
    }

    #[tokio::test]
    async fn test_soft_delete_department() {
        let catalog = service().await;
        let hr = catalog.create_department(department("HR")).await.unwrap();
        catalog.create_department(department("Finance")).await.unwrap();

        catalog.delete_department(hr.id).await.unwrap();

        let active = catalog.list_departments().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Finance");
        let hr = catalog.get_department(hr.id).await.unwrap();
        assert!(!hr.is_active);

        let err = catalog.delete_department(42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_dish_keeps_exact_price() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();
        assert_eq!(dish.price, dec!(15.99));
        assert_eq!(dish.price.to_string(), "15.99");
        assert_eq!(dish.stock_quantity, 10);
        assert!(dish.is_available);
    }

    #[tokio::test]
    async fn test_create_dish_validation() {
        let catalog = service().await;

        let err = catalog
            .create_dish(DishCreate {
                price: dec!(0),
                ..pizza()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DishInvalidPrice);
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let err = catalog
            .create_dish(DishCreate {
                name: "  ".into(),
                ..pizza()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let err = catalog
            .create_dish(DishCreate {
                stock_quantity: -1,
                ..pizza()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        assert!(catalog.list_dishes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_dish_only_changes_supplied_fields() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();

        let updated = catalog
            .update_dish(
                dish.id,
                DishUpdate {
                    price: Some(dec!(16.49)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, dec!(16.49));
        assert_eq!(updated.name, dish.name);
        assert_eq!(updated.description, dish.description);
        assert_eq!(updated.category, dish.category);
        assert_eq!(updated.stock_quantity, dish.stock_quantity);

        let err = catalog
            .update_dish(999, DishUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DishNotFound);
    }

    #[tokio::test]
    async fn test_soft_delete_dish_hides_from_menu() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();
        catalog
            .create_dish(DishCreate {
                name: "Caesar Salad".into(),
                price: dec!(9.99),
                category: "Salad".into(),
                ..pizza()
            })
            .await
            .unwrap();

        catalog.delete_dish(dish.id).await.unwrap();

        let menu = catalog.list_available_dishes().await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Caesar Salad");
        assert_eq!(catalog.list_dishes().await.unwrap().len(), 2);
        assert_eq!(catalog.list_categories().await.unwrap(), vec!["Salad"]);
        assert!(catalog.list_dishes_by_category("Pizza").await.unwrap().is_empty());
        assert!(!catalog.get_dish(dish.id).await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_restock_never_goes_negative() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();

        let dish = catalog.restock(dish.id, 5).await.unwrap();
        assert_eq!(dish.stock_quantity, 15);

        let dish = catalog.restock(dish.id, -15).await.unwrap();
        assert_eq!(dish.stock_quantity, 0);

        let err = catalog.restock(dish.id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(catalog.get_dish(dish.id).await.unwrap().stock_quantity, 0);

        let err = catalog.restock(dish.id, i64::MIN).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(catalog.get_dish(dish.id).await.unwrap().stock_quantity, 0);

        let err = catalog.restock(999, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DishNotFound);
    }

    #[tokio::test]
    async fn test_restock_respects_ceiling() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();

        let err = catalog.restock(dish.id, i64::MAX).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        // Within the delta bound but past the ceiling once added to stock 10
        let err = catalog.restock(dish.id, MAX_STOCK).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        // Row is untouched and the menu still reads
        assert_eq!(catalog.get_dish(dish.id).await.unwrap().stock_quantity, 10);
        let menu = catalog.list_available_dishes().await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].stock_quantity, 10);

        let dish = catalog.restock(dish.id, MAX_STOCK - 10).await.unwrap();
        assert_eq!(dish.stock_quantity, MAX_STOCK);
    }

    #[tokio::test]
    async fn test_update_dish_rejects_stock_past_ceiling() {
        let catalog = service().await;
        let dish = catalog.create_dish(pizza()).await.unwrap();

        let err = catalog
            .update_dish(
                dish.id,
                DishUpdate {
                    stock_quantity: Some(MAX_STOCK + 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(catalog.get_dish(dish.id).await.unwrap().stock_quantity, 10);
    }
}
