//! Company Repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Company, CompanyUpdate};

#[derive(Clone)]
pub struct CompanyRepository {
    base: BaseRepository,
}

impl CompanyRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active companies
    pub async fn find_all(&self) -> RepoResult<Vec<Company>> {
        let companies: Vec<Company> = self
            .base
            .db()
            .query("SELECT * FROM company WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(companies)
    }

    /// Find all companies including disabled ones
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Company>> {
        let companies: Vec<Company> = self
            .base
            .db()
            .query("SELECT * FROM company ORDER BY name")
            .await?
            .take(0)?;
        Ok(companies)
    }

    /// Find company by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Company>> {
        let thing = parse_record_id(id, "company")?;
        let company: Option<Company> = self.base.db().select(thing).await?;
        Ok(company)
    }

    pub async fn find_by_record_id(&self, id: &RecordId) -> RepoResult<Option<Company>> {
        let company: Option<Company> = self.base.db().select(id.clone()).await?;
        Ok(company)
    }

    /// Find company by its display code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Company>> {
        let code_owned = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM company WHERE company_code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let companies: Vec<Company> = result.take(0)?;
        Ok(companies.into_iter().next())
    }

    /// Insert a company owned by an existing user
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        address: Option<String>,
        tax_id: Option<String>,
        company_code: String,
        user_id: RecordId,
        now: i64,
    ) -> RepoResult<Company> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE company SET
                    name = $name,
                    email = $email,
                    phone = $phone,
                    address = $address,
                    tax_id = $tax_id,
                    company_code = $company_code,
                    user_id = $user_id,
                    supervisors = [],
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", name))
            .bind(("email", email))
            .bind(("phone", phone))
            .bind(("address", address))
            .bind(("tax_id", tax_id))
            .bind(("company_code", company_code))
            .bind(("user_id", user_id))
            .bind(("now", now))
            .await?;

        let created: Option<Company> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create company".to_string()))
    }

    /// Update contact fields (absent fields left untouched)
    pub async fn update(&self, id: &str, data: CompanyUpdate) -> RepoResult<Company> {
        let thing = parse_record_id(id, "company")?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Company {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    phone = $phone OR phone,
                    address = $address OR address,
                    tax_id = $tax_id OR tax_id,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("tax_id", data.tax_id))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        result
            .take::<Option<Company>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Company {} not found", id)))
    }

    /// Toggle the activation flag
    pub async fn set_active(&self, id: &RecordId, is_active: bool) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET is_active = $is_active, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("is_active", is_active))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
    }

    /// Append a supervisor back-reference
    pub async fn add_supervisor(&self, id: &RecordId, supervisor: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET supervisors += $supervisor, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("supervisor", supervisor.clone()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
    }

    /// Remove a supervisor back-reference
    pub async fn remove_supervisor(&self, id: &RecordId, supervisor: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET supervisors -= $supervisor, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("supervisor", supervisor.clone()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
    }
}
