//! Company Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Company ID type
pub type CompanyId = RecordId;

/// Company entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CompanyId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// GST-like tax identifier
    pub tax_id: Option<String>,
    /// Display lookup key derived from the creation timestamp
    pub company_code: String,
    /// Owning user (role = COMPANY), 1:1
    #[serde(with = "serde_helpers::record_id")]
    pub user_id: RecordId,
    /// Supervisor back-references
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub supervisors: Vec<RecordId>,
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

/// Company registration payload (creates the owning user too)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompanyRegister {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    /// Owner display name; defaults to the company name
    pub owner_name: Option<String>,
}

/// Update company payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// Compact company view for annotated query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CompanyId>,
    pub name: String,
    pub company_code: String,
}

impl Company {
    /// Derive a display company code from a creation timestamp.
    ///
    /// Base-36 keeps the code short and unambiguous; uniqueness is
    /// display-grade only (two registrations in the same millisecond
    /// would collide, acceptable per the data model).
    pub fn generate_code(now_millis: i64) -> String {
        let mut n = now_millis.unsigned_abs();
        let digits = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let mut buf = Vec::new();
        while n > 0 {
            buf.push(digits[(n % 36) as usize]);
            n /= 36;
        }
        buf.reverse();
        let body = if buf.is_empty() {
            "0".to_string()
        } else {
            String::from_utf8(buf).unwrap_or_else(|_| "0".to_string())
        };
        format!("CMP-{}", body)
    }

    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            company_code: self.company_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_code_is_base36_of_timestamp() {
        assert_eq!(Company::generate_code(36), "CMP-10");
        assert_eq!(Company::generate_code(35), "CMP-Z");
        assert_eq!(Company::generate_code(0), "CMP-0");
        // Monotonic timestamps give distinct codes
        assert_ne!(
            Company::generate_code(1_700_000_000_000),
            Company::generate_code(1_700_000_000_001)
        );
    }
}
