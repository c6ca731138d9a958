//! Company Service
//!
//! Registration is a two-write sequence (owning user, then company, then
//! back-link) with a compensating delete: if the company write fails the
//! freshly created user is removed, so a half-registered company can
//! never linger in the store.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::db::models::{Company, CompanyRegister, CompanyUpdate, Role, UserCreate};
use crate::db::repository::{CompanyRepository, UserRepository, parse_record_id};
use crate::utils::{AppError, AppResult, SharedClock};

pub struct CompanyService {
    companies: CompanyRepository,
    users: UserRepository,
    clock: SharedClock,
}

impl CompanyService {
    pub fn new(db: Surreal<Db>, clock: SharedClock) -> Self {
        Self {
            companies: CompanyRepository::new(db.clone()),
            users: UserRepository::new(db),
            clock,
        }
    }

    /// Register a company together with its owning user (role COMPANY)
    pub async fn register(&self, data: CompanyRegister) -> AppResult<Company> {
        data.validate()?;

        let now = self.clock.now_millis();
        let company_code = Company::generate_code(now);

        let owner = self
            .users
            .create(UserCreate {
                name: data.owner_name.clone().unwrap_or_else(|| data.name.clone()),
                email: data.email.clone(),
                password: data.password.clone(),
                role: Role::Company,
                phone: data.phone.clone(),
                address: data.address.clone(),
                company_id: None,
                government_id: None,
                bank_details: None,
                salary_structure: None,
            })
            .await?;
        let owner_id = owner
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;

        let company = match self
            .companies
            .create(
                data.name,
                data.email,
                data.phone,
                data.address,
                data.tax_id,
                company_code,
                owner_id.clone(),
                now,
            )
            .await
        {
            Ok(company) => company,
            Err(e) => {
                // Compensating action: never leave an orphan COMPANY user
                if let Err(cleanup) = self.users.delete(&owner_id).await {
                    tracing::error!(
                        "Registration rollback failed, orphan user {}: {}",
                        owner_id,
                        cleanup
                    );
                }
                return Err(e.into());
            }
        };

        let company_id = company
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Company record without id"))?;
        self.users
            .set_company_link(&owner_id, Some((company_id, company.company_code.clone())))
            .await?;

        tracing::info!(
            "Company registered: {} ({})",
            company.name,
            company.company_code
        );
        Ok(company)
    }

    /// Get one company
    pub async fn get(&self, id: &str) -> AppResult<Company> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {} not found", id)))
    }

    /// List companies, optionally including disabled ones
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Company>> {
        if include_inactive {
            Ok(self.companies.find_all_with_inactive().await?)
        } else {
            Ok(self.companies.find_all().await?)
        }
    }

    /// Update contact fields
    pub async fn update(&self, id: &str, data: CompanyUpdate) -> AppResult<Company> {
        Ok(self.companies.update(id, data).await?)
    }

    /// Enable or disable a company; cascades to the owning user
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<Company> {
        let company = self.get(id).await?;
        let company_id = parse_record_id(id, "company")?;

        self.companies.set_active(&company_id, is_active).await?;
        self.users.set_active(&company.user_id, is_active).await?;

        tracing::info!(
            "Company {} {}",
            company.company_code,
            if is_active { "enabled" } else { "disabled" }
        );
        self.get(id).await
    }
}
