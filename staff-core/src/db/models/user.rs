//! User Model
//!
//! Role-tagged identity record: platform admins, company owners,
//! supervisors and employees all live in the `user` table. Role-specific
//! payloads (salary structure, bank details, government id) are optional
//! and only populated for the roles that carry them.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// User ID type
pub type UserId = RecordId;

/// User role tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Company,
    Supervisor,
    Employee,
}

/// Fixed monthly salary structure (Mode A payroll input)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SalaryStructure {
    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub hra: f64,
    #[serde(default)]
    pub allowances: f64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub pf_applicable: bool,
    /// Explicit PF amount; 0 derives 12% of basic
    #[serde(default)]
    pub pf_amount: f64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub esi_applicable: bool,
    /// Explicit ESI amount; 0 derives 0.75% of gross
    #[serde(default)]
    pub esi_amount: f64,
}

impl SalaryStructure {
    pub fn gross(&self) -> f64 {
        self.basic_salary + self.hra + self.allowances
    }
}

/// Employee bank details
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BankDetails {
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc_code: Option<String>,
}

/// Uploaded document reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,

    /// Denormalized "current company" pointer, kept in sync by the
    /// assignment engine. Display cache only; authoritative answers
    /// always query the assignment table.
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub company_id: Option<RecordId>,
    pub company_code: Option<String>,

    // Employee-only payloads
    pub government_id: Option<String>,
    pub bank_details: Option<BankDetails>,
    pub salary_structure: Option<SalaryStructure>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,

    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Owning company for supervisors/employees created by a company
    pub company_id: Option<String>,
    pub government_id: Option<String>,
    pub bank_details: Option<BankDetails>,
    pub salary_structure: Option<SalaryStructure>,
}

/// Update user payload (absent fields left untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_structure: Option<SalaryStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Compact user view for annotated query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
