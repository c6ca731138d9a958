//! Assignment Repository
//!
//! Interval queries use inclusive bounds on both ends: an assignment is
//! "covering" a date when `start_date <= date <= end_date`, and two
//! intervals overlap when `start_date <= other_end AND end_date >= other_start`.

use serde::Deserialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Assignment, AssignmentStatus};

/// Optional filters for assignment listings
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub employee: Option<RecordId>,
    pub company: Option<RecordId>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Clone)]
pub struct AssignmentRepository {
    base: BaseRepository,
}

impl AssignmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find assignment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Assignment>> {
        let thing = parse_record_id(id, "assignment")?;
        let assignment: Option<Assignment> = self.base.db().select(thing).await?;
        Ok(assignment)
    }

    /// List assignments, newest interval first
    pub async fn find_all(&self, filter: AssignmentFilter) -> RepoResult<Vec<Assignment>> {
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM assignment
                    WHERE ($employee = NONE OR employee = $employee)
                      AND ($company = NONE OR company = $company)
                      AND ($status = NONE OR status = $status)
                    ORDER BY start_date DESC"#,
            )
            .bind(("employee", filter.employee))
            .bind(("company", filter.company))
            .bind(("status", filter.status))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// Insert a new ACTIVE assignment
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        employee: RecordId,
        company: RecordId,
        start_date: i64,
        end_date: i64,
        daily_salary: f64,
        notes: Option<String>,
        assigned_by: RecordId,
        now: i64,
    ) -> RepoResult<Assignment> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE assignment SET
                    employee = $employee,
                    company = $company,
                    start_date = $start_date,
                    end_date = $end_date,
                    daily_salary = $daily_salary,
                    notes = $notes,
                    status = $status,
                    assigned_by = $assigned_by,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("employee", employee))
            .bind(("company", company))
            .bind(("start_date", start_date))
            .bind(("end_date", end_date))
            .bind(("daily_salary", daily_salary))
            .bind(("notes", notes))
            .bind(("status", AssignmentStatus::Active))
            .bind(("assigned_by", assigned_by))
            .bind(("now", now))
            .await?;

        let created: Option<Assignment> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create assignment".to_string()))
    }

    /// ACTIVE assignments of an employee overlapping `[start, end]`
    pub async fn find_active_overlapping(
        &self,
        employee: &RecordId,
        start_date: i64,
        end_date: i64,
    ) -> RepoResult<Vec<Assignment>> {
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM assignment
                    WHERE employee = $employee
                      AND status = $active
                      AND start_date <= $end_date
                      AND end_date >= $start_date"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("active", AssignmentStatus::Active))
            .bind(("start_date", start_date))
            .bind(("end_date", end_date))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// ACTIVE assignment of an employee covering a date, optionally
    /// restricted to one company. Non-overlap means at most one exists.
    pub async fn find_active_covering(
        &self,
        employee: &RecordId,
        company: Option<&RecordId>,
        date: i64,
    ) -> RepoResult<Option<Assignment>> {
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM assignment
                    WHERE employee = $employee
                      AND ($company = NONE OR company = $company)
                      AND status = $active
                      AND start_date <= $date
                      AND end_date >= $date
                    LIMIT 1"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("company", company.cloned()))
            .bind(("active", AssignmentStatus::Active))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(assignments.into_iter().next())
    }

    /// All ACTIVE assignments of a company covering a date
    pub async fn find_active_for_company(
        &self,
        company: &RecordId,
        date: i64,
    ) -> RepoResult<Vec<Assignment>> {
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM assignment
                    WHERE company = $company
                      AND status = $active
                      AND start_date <= $date
                      AND end_date >= $date
                    ORDER BY start_date"#,
            )
            .bind(("company", company.clone()))
            .bind(("active", AssignmentStatus::Active))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// Employee ids bound by any ACTIVE assignment covering a date
    pub async fn employees_with_active_covering(&self, date: i64) -> RepoResult<Vec<RecordId>> {
        #[derive(Deserialize)]
        struct Row {
            #[serde(with = "crate::db::models::serde_helpers::record_id")]
            employee: RecordId,
        }

        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                r#"SELECT employee FROM assignment
                    WHERE status = $active
                      AND start_date <= $date
                      AND end_date >= $date"#,
            )
            .bind(("active", AssignmentStatus::Active))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.employee).collect())
    }

    /// ACTIVE assignments whose end date has passed (sweep input)
    pub async fn find_expired_active(&self, now: i64) -> RepoResult<Vec<Assignment>> {
        let assignments: Vec<Assignment> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM assignment
                    WHERE status = $active AND end_date < $now
                    ORDER BY end_date"#,
            )
            .bind(("active", AssignmentStatus::Active))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(assignments)
    }

    /// Partial field update; caller has already validated the status
    /// transition
    pub async fn update_fields(
        &self,
        id: &RecordId,
        start_date: Option<i64>,
        end_date: Option<i64>,
        daily_salary: Option<f64>,
        notes: Option<String>,
        status: Option<AssignmentStatus>,
        now: i64,
    ) -> RepoResult<Assignment> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    start_date = IF $has_start THEN $start_date ELSE start_date END,
                    end_date = IF $has_end THEN $end_date ELSE end_date END,
                    daily_salary = IF $has_salary THEN $daily_salary ELSE daily_salary END,
                    notes = $notes OR notes,
                    status = IF $has_status THEN $status ELSE status END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("has_start", start_date.is_some()))
            .bind(("start_date", start_date))
            .bind(("has_end", end_date.is_some()))
            .bind(("end_date", end_date))
            .bind(("has_salary", daily_salary.is_some()))
            .bind(("daily_salary", daily_salary))
            .bind(("notes", notes))
            .bind(("has_status", status.is_some()))
            .bind(("status", status))
            .bind(("now", now))
            .await?;

        result
            .take::<Option<Assignment>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Assignment {} not found", id)))
    }

    /// Flip to COMPLETED and stamp the end date (explicit complete / sweep)
    pub async fn mark_completed(&self, id: &RecordId, end_date: i64, now: i64) -> RepoResult<Assignment> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $completed,
                    end_date = $end_date,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("completed", AssignmentStatus::Completed))
            .bind(("end_date", end_date))
            .bind(("now", now))
            .await?;

        result
            .take::<Option<Assignment>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Assignment {} not found", id)))
    }
}
