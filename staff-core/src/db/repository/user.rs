//! User Repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Role, User, UserCreate, UserUpdate};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(id, "user")?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    pub async fn find_by_record_id(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find all active users with the given role
    pub async fn find_by_role(&self, role: Role) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = $role AND is_active = true ORDER BY name")
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Active employees currently linked to a company (display-cache
    /// pointer, refreshed by the assignment engine)
    pub async fn find_employees_of_company(&self, company: &RecordId) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE role = $role AND is_active = true AND company_id = $company ORDER BY name",
            )
            .bind(("role", Role::Employee))
            .bind(("company", company.clone()))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Create a new user (hashes the password)
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let company_id = match data.company_id.as_deref() {
            Some(id) => Some(parse_record_id(id, "company")?),
            None => None,
        };

        let now = chrono::Utc::now().timestamp_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    phone = $phone,
                    address = $address,
                    company_id = $company_id,
                    company_code = NONE,
                    government_id = $government_id,
                    bank_details = $bank_details,
                    salary_structure = $salary_structure,
                    documents = [],
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("company_id", company_id))
            .bind(("government_id", data.government_id))
            .bind(("bank_details", data.bank_details))
            .bind(("salary_structure", data.salary_structure))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update profile fields (absent fields left untouched)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = parse_record_id(id, "user")?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let now = chrono::Utc::now().timestamp_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    phone = $phone OR phone,
                    address = $address OR address,
                    government_id = $government_id OR government_id,
                    bank_details = $bank_details OR bank_details,
                    salary_structure = $salary_structure OR salary_structure,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("government_id", data.government_id))
            .bind(("bank_details", data.bank_details))
            .bind(("salary_structure", data.salary_structure))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .bind(("now", now))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Replace the stored password hash
    pub async fn set_password_hash(&self, id: &RecordId, hash_pass: String) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET hash_pass = $hash_pass, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
    }

    /// Change the role tag (promotion path)
    pub async fn set_role(&self, id: &RecordId, role: Role) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET role = $role, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("role", role))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
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

    /// Refresh the denormalized current-company pointer
    pub async fn set_company_link(
        &self,
        id: &RecordId,
        link: Option<(RecordId, String)>,
    ) -> RepoResult<()> {
        let (company_id, company_code) = match link {
            Some((company, code)) => (Some(company), Some(code)),
            None => (None, None),
        };
        self.base
            .db()
            .query(
                "UPDATE $thing SET company_id = $company_id, company_code = $company_code, updated_at = $now",
            )
            .bind(("thing", id.clone()))
            .bind(("company_id", company_id))
            .bind(("company_code", company_code))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        Ok(())
    }

    /// Hard delete (supervisor removal path only)
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await?;
        Ok(())
    }
}
