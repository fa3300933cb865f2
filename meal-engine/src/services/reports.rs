//! Report Service - dashboard aggregates
//!
//! Cancelled orders never count towards revenue or sales.

use crate::db::repository::{department, dish, order, report};
use crate::order_money::from_cents;
use crate::utils::AppResult;
use shared::models::{DepartmentOrderSummary, DishOrderSummary, ReportSummary};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self) -> AppResult<ReportSummary> {
        Ok(ReportSummary {
            total_orders: order::count(&self.pool).await?,
            total_dishes: dish::count(&self.pool).await?,
            active_departments: department::count_active(&self.pool).await?,
            revenue: from_cents(report::revenue_cents(&self.pool).await?),
        })
    }

    pub async fn dish_summaries(&self) -> AppResult<Vec<DishOrderSummary>> {
        Ok(report::dish_summaries(&self.pool).await?)
    }

    pub async fn department_summaries(&self) -> AppResult<Vec<DepartmentOrderSummary>> {
        Ok(report::department_summaries(&self.pool).await?)
    }
}
