//! User Service
//!
//! Lifecycle operations for the role-tagged user records: creation,
//! profile edits, promotion, password changes, activation toggles and
//! the supervisor delete path. Users are never hard-deleted except
//! supervisors, whose removal also unlinks them from their company.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::db::models::{Role, User, UserCreate, UserUpdate};
use crate::db::repository::{CompanyRepository, UserRepository, parse_record_id};
use crate::utils::{AppError, AppResult, SharedClock};

pub struct UserService {
    users: UserRepository,
    companies: CompanyRepository,
    #[allow(dead_code)]
    clock: SharedClock,
}

impl UserService {
    pub fn new(db: Surreal<Db>, clock: SharedClock) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            companies: CompanyRepository::new(db),
            clock,
        }
    }

    /// Create an employee or supervisor
    pub async fn create(&self, data: UserCreate) -> AppResult<User> {
        data.validate()?;
        if !matches!(data.role, Role::Employee | Role::Supervisor | Role::Admin) {
            return Err(AppError::validation(
                "Company users are created through company registration".to_string(),
            ));
        }

        let supervisor_home = match (&data.role, data.company_id.as_deref()) {
            (Role::Supervisor, Some(id)) => Some(parse_record_id(id, "company")?),
            (Role::Supervisor, None) => {
                return Err(AppError::validation(
                    "Supervisors must belong to a company".to_string(),
                ));
            }
            _ => None,
        };

        let user = self.users.create(data).await?;

        // Supervisors are back-referenced from their company
        if let (Some(company), Some(user_id)) = (supervisor_home, user.id.as_ref()) {
            self.companies.add_supervisor(&company, user_id).await?;
        }

        tracing::info!("User created: {} ({:?})", user.email, user.role);
        Ok(user)
    }

    /// Get one user
    pub async fn get(&self, id: &str) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))
    }

    /// Find by unique email
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with email {} not found", email)))
    }

    /// List active users with a role
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        Ok(self.users.find_by_role(role).await?)
    }

    /// Update profile fields
    pub async fn update(&self, id: &str, data: UserUpdate) -> AppResult<User> {
        Ok(self.users.update(id, data).await?)
    }

    /// Promote an employee to supervisor within their current company
    pub async fn promote_to_supervisor(&self, id: &str) -> AppResult<User> {
        let user = self.get(id).await?;
        if user.role != Role::Employee {
            return Err(AppError::business_rule(format!(
                "Only employees can be promoted (role: {:?})",
                user.role
            )));
        }
        let company = user.company_id.clone().ok_or_else(|| {
            AppError::business_rule("Employee is not attached to a company".to_string())
        })?;
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;

        self.users.set_role(&user_id, Role::Supervisor).await?;
        self.companies.add_supervisor(&company, &user_id).await?;

        tracing::info!("User promoted to supervisor: {}", user.email);
        self.get(id).await
    }

    /// Change a user's password after verifying the current one
    pub async fn change_password(
        &self,
        id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.len() < 6 {
            return Err(AppError::validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        let user = self.get(id).await?;
        let verified = user
            .verify_password(current_password)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
        if !verified {
            return Err(AppError::validation("Current password is incorrect".to_string()));
        }

        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;
        let hash = User::hash_password(new_password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
        self.users.set_password_hash(&user_id, hash).await?;
        Ok(())
    }

    /// Toggle the activation flag
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<User> {
        let user = self.get(id).await?;
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;
        self.users.set_active(&user_id, is_active).await?;
        self.get(id).await
    }

    /// Delete a supervisor and unlink them from their company.
    /// The only hard-delete path for users.
    pub async fn delete_supervisor(&self, id: &str) -> AppResult<()> {
        let user = self.get(id).await?;
        if user.role != Role::Supervisor {
            return Err(AppError::business_rule(format!(
                "Only supervisors can be deleted (role: {:?})",
                user.role
            )));
        }
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;

        if let Some(company) = user.company_id.as_ref() {
            self.companies.remove_supervisor(company, &user_id).await?;
        }
        self.users.delete(&user_id).await?;

        tracing::info!("Supervisor deleted: {}", user.email);
        Ok(())
    }
}
