//! Salary Repository
//!
//! Payslips are keyed by (employee, company, month, year) — company is
//! NONE for fixed-structure payslips — and upserted: regeneration for a
//! period replaces the stored figures instead of accumulating records.
//! A unique index backs the key.

use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AttendanceTotals, Salary, SalaryBreakdown, SalaryStatus};

/// Full payslip payload for create/replace
#[derive(Debug, Clone, Serialize)]
pub struct SalaryWrite {
    pub employee: RecordId,
    pub company: Option<RecordId>,
    pub month: u32,
    pub year: i32,
    #[serde(flatten)]
    pub breakdown: SalaryBreakdown,
    pub totals: AttendanceTotals,
    pub days_worked: f64,
    pub status: SalaryStatus,
    pub generated_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Optional filters for salary listings
#[derive(Debug, Clone, Default)]
pub struct SalaryFilter {
    pub employee: Option<RecordId>,
    pub company: Option<RecordId>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<SalaryStatus>,
}

#[derive(Clone)]
pub struct SalaryRepository {
    base: BaseRepository,
}

impl SalaryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The payslip for a period key, if one exists
    pub async fn find_by_period(
        &self,
        employee: &RecordId,
        company: Option<&RecordId>,
        month: u32,
        year: i32,
    ) -> RepoResult<Option<Salary>> {
        let records: Vec<Salary> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM salary
                    WHERE employee = $employee
                      AND company = $company
                      AND month = $month AND year = $year
                    LIMIT 1"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("company", company.cloned()))
            .bind(("month", month))
            .bind(("year", year))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }

    /// Create or replace the payslip for the write's period key.
    /// Returns the stored record and whether it was newly created.
    pub async fn upsert(&self, mut write: SalaryWrite) -> RepoResult<(Salary, bool)> {
        let existing = self
            .find_by_period(
                &write.employee,
                write.company.as_ref(),
                write.month,
                write.year,
            )
            .await?;

        match existing {
            Some(prev) => {
                let id = prev
                    .id
                    .clone()
                    .ok_or_else(|| RepoError::Database("Salary record without id".to_string()))?;
                // Replace figures, keep the original creation stamp
                write.created_at = prev.created_at.unwrap_or(write.created_at);
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $thing CONTENT $data RETURN AFTER")
                    .bind(("thing", id))
                    .bind(("data", write))
                    .await?;
                let updated: Option<Salary> = result.take(0)?;
                updated
                    .map(|s| (s, false))
                    .ok_or_else(|| RepoError::Database("Failed to replace salary".to_string()))
            }
            None => {
                let mut result = self
                    .base
                    .db()
                    .query("CREATE salary CONTENT $data RETURN AFTER")
                    .bind(("data", write))
                    .await?;
                let created: Option<Salary> = result.take(0)?;
                created
                    .map(|s| (s, true))
                    .ok_or_else(|| RepoError::Database("Failed to create salary".to_string()))
            }
        }
    }

    /// List payslips, newest period first
    pub async fn find_all(&self, filter: SalaryFilter) -> RepoResult<Vec<Salary>> {
        let records: Vec<Salary> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM salary
                    WHERE ($employee = NONE OR employee = $employee)
                      AND ($company = NONE OR company = $company)
                      AND ($month = NONE OR month = $month)
                      AND ($year = NONE OR year = $year)
                      AND ($status = NONE OR status = $status)
                    ORDER BY year DESC, month DESC"#,
            )
            .bind(("employee", filter.employee))
            .bind(("company", filter.company))
            .bind(("month", filter.month))
            .bind(("year", filter.year))
            .bind(("status", filter.status))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// All payslips of one employee, newest period first
    pub async fn find_by_employee(&self, employee: &RecordId) -> RepoResult<Vec<Salary>> {
        self.find_all(SalaryFilter {
            employee: Some(employee.clone()),
            ..Default::default()
        })
        .await
    }

    /// Mark a payslip paid
    pub async fn set_status(&self, id: &RecordId, status: SalaryStatus) -> RepoResult<Salary> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        result
            .take::<Option<Salary>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Salary {} not found", id)))
    }
}
