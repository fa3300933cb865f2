//! Department Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Department entity (soft-deleted via `is_active`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create department payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DepartmentCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Update department payload (unset fields keep their value)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DepartmentUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
