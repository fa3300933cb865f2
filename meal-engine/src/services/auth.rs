//! Account Service - registration, authentication and account administration
//!
//! Identity is always passed in explicitly; nothing here remembers who is
//! "logged in".

use crate::auth::CredentialHasher;
use crate::db::repository::user::NewUser;
use crate::db::repository::{RepoError, department, user};
use crate::utils::validation::{
    validate_optional_required_text, validate_password, validate_payload, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserCreate, UserRole, UserUpdate};
use sqlx::SqlitePool;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;

#[derive(Clone, Debug)]
pub struct AuthService {
    pool: SqlitePool,
    hasher: Arc<dyn CredentialHasher>,
    min_password_len: usize,
}

impl AuthService {
    pub fn new(pool: SqlitePool, hasher: Arc<dyn CredentialHasher>, min_password_len: usize) -> Self {
        Self {
            pool,
            hasher,
            min_password_len,
        }
    }

    /// Create a regular account; the password is stored only as a hash
    pub async fn register(&self, data: UserCreate) -> AppResult<User> {
        validate_payload(&data)?;
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.phone, "phone", MAX_PHONE_LEN)?;
        validate_password(&data.password, self.min_password_len)?;
        if let Some(department_id) = data.department_id {
            self.ensure_active_department(department_id).await?;
        }

        if user::find_by_email(&self.pool, &data.email).await?.is_some() {
            tracing::warn!("Registration rejected: email already registered");
            return Err(email_exists(&data.email));
        }

        let password_hash = self.hasher.hash(&data.password)?;
        let created = user::create(
            &self.pool,
            NewUser {
                name: &data.name,
                email: &data.email,
                password_hash: &password_hash,
                phone: &data.phone,
                department_id: data.department_id,
            },
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => email_exists(&data.email),
            other => other.into(),
        })?;

        tracing::info!(user_id = created.id, "User registered");
        Ok(created)
    }

    /// Verify credentials and return the account
    ///
    /// Unknown email, wrong password and deactivated account all fail with
    /// the same `InvalidCredentials` error after one hash verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(found) = user::find_by_email(&self.pool, email).await? else {
            self.hasher.verify_dummy(password);
            tracing::warn!("Authentication failed");
            return Err(AppError::invalid_credentials());
        };

        let verified = self.hasher.verify(password, &found.password_hash);
        if !verified || !found.is_active {
            tracing::warn!("Authentication failed");
            return Err(AppError::invalid_credentials());
        }

        tracing::info!(user_id = found.id, "User authenticated");
        Ok(found)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        user::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(user::find_all(&self.pool).await?)
    }

    /// Partial profile update; a new email must still be unique
    pub async fn update_profile(&self, id: i64, data: UserUpdate) -> AppResult<User> {
        validate_payload(&data)?;
        validate_optional_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_required_text(&data.phone, "phone", MAX_PHONE_LEN)?;

        let current = self.get_by_id(id).await?;
        if let Some(email) = &data.email
            && email != &current.email
            && user::find_by_email(&self.pool, email).await?.is_some()
        {
            return Err(email_exists(email));
        }
        if let Some(department_id) = data.department_id
            && current.department_id != Some(department_id)
        {
            self.ensure_active_department(department_id).await?;
        }

        let updated = user::update(&self.pool, id, &data)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => email_exists(data.email.as_deref().unwrap_or_default()),
                RepoError::NotFound(_) => user_not_found(id),
                other => other.into(),
            })?;
        tracing::info!(user_id = id, "User profile updated");
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let found = self.get_by_id(id).await?;
        if !self.hasher.verify(current_password, &found.password_hash) {
            tracing::warn!(user_id = id, "Password change rejected");
            return Err(AppError::invalid_credentials());
        }
        validate_password(new_password, self.min_password_len)?;

        let password_hash = self.hasher.hash(new_password)?;
        user::update_password_hash(&self.pool, id, &password_hash).await?;
        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    /// Out-of-band role change (e.g. elevating an administrator)
    pub async fn set_role(&self, id: i64, role: UserRole) -> AppResult<User> {
        let updated = user::set_role(&self.pool, id, role)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => user_not_found(id),
                other => other.into(),
            })?;
        tracing::info!(user_id = id, ?role, "User role changed");
        Ok(updated)
    }

    /// Soft delete: the account can no longer authenticate
    pub async fn deactivate(&self, id: i64) -> AppResult<()> {
        if !user::set_active(&self.pool, id, false).await? {
            return Err(user_not_found(id));
        }
        tracing::info!(user_id = id, "User deactivated");
        Ok(())
    }

    /// Gate for administrative operations
    pub async fn require_admin(&self, id: i64) -> AppResult<User> {
        let found = self.get_by_id(id).await?;
        if !found.is_active || !found.is_admin() {
            tracing::warn!(user_id = id, "Admin privileges required");
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
        Ok(found)
    }

    async fn ensure_active_department(&self, department_id: i64) -> AppResult<()> {
        match department::find_by_id(&self.pool, department_id).await? {
            Some(dep) if dep.is_active => Ok(()),
            Some(_) => Err(AppError::with_message(
                ErrorCode::DepartmentInactive,
                format!("Department {department_id} is inactive"),
            )),
            None => Err(AppError::with_message(
                ErrorCode::DepartmentNotFound,
                format!("Department {department_id} not found"),
            )),
        }
    }
}

fn email_exists(email: &str) -> AppError {
    AppError::with_message(ErrorCode::EmailExists, "Email already registered")
        .with_detail("email", email)
}

fn user_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        .with_detail("user_id", id)
}
