//! Attendance Repository
//!
//! Dates are UTC-midnight millis throughout; conversion from calendar
//! dates happens in the attendance service, never here.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Attendance, AttendanceStatus};

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The record for (employee, date), if one exists
    pub async fn find_by_employee_and_date(
        &self,
        employee: &RecordId,
        date: i64,
    ) -> RepoResult<Option<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE employee = $employee AND date = $date LIMIT 1")
            .bind(("employee", employee.clone()))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }

    /// Insert the first mark for (employee, date)
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        employee: RecordId,
        company: RecordId,
        date: i64,
        status: AttendanceStatus,
        remarks: Option<String>,
        check_in_time: Option<String>,
        check_out_time: Option<String>,
        supervisor: Option<RecordId>,
        now: i64,
    ) -> RepoResult<Attendance> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE attendance SET
                    employee = $employee,
                    company = $company,
                    date = $date,
                    status = $status,
                    remarks = $remarks,
                    check_in_time = $check_in_time,
                    check_out_time = $check_out_time,
                    supervisor = $supervisor,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("employee", employee))
            .bind(("company", company))
            .bind(("date", date))
            .bind(("status", status))
            .bind(("remarks", remarks))
            .bind(("check_in_time", check_in_time))
            .bind(("check_out_time", check_out_time))
            .bind(("supervisor", supervisor))
            .bind(("now", now))
            .await?;

        let created: Option<Attendance> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create attendance".to_string()))
    }

    /// Overwrite an existing mark in place (last write wins)
    pub async fn overwrite(
        &self,
        id: &RecordId,
        status: AttendanceStatus,
        remarks: Option<String>,
        check_in_time: Option<String>,
        check_out_time: Option<String>,
        now: i64,
    ) -> RepoResult<Attendance> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $status,
                    remarks = $remarks,
                    check_in_time = $check_in_time,
                    check_out_time = $check_out_time,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("remarks", remarks))
            .bind(("check_in_time", check_in_time))
            .bind(("check_out_time", check_out_time))
            .bind(("now", now))
            .await?;

        result
            .take::<Option<Attendance>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Attendance {} not found", id)))
    }

    /// All records for an employee, newest first
    pub async fn find_by_employee(&self, employee: &RecordId) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE employee = $employee ORDER BY date DESC")
            .bind(("employee", employee.clone()))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Records for an employee in `[start, end)`, newest first, optionally
    /// company-scoped
    pub async fn find_by_employee_in_window(
        &self,
        employee: &RecordId,
        company: Option<&RecordId>,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM attendance
                    WHERE employee = $employee
                      AND ($company = NONE OR company = $company)
                      AND date >= $start AND date < $end
                    ORDER BY date DESC"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("company", company.cloned()))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Records of a company for one date
    pub async fn find_by_company_and_date(
        &self,
        company: &RecordId,
        date: i64,
    ) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE company = $company AND date = $date")
            .bind(("company", company.clone()))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Records marked by a supervisor on one date
    pub async fn find_by_supervisor_and_date(
        &self,
        supervisor: &RecordId,
        date: i64,
    ) -> RepoResult<Vec<Attendance>> {
        let records: Vec<Attendance> = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE supervisor = $supervisor AND date = $date ORDER BY updated_at DESC",
            )
            .bind(("supervisor", supervisor.clone()))
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(records)
    }
}
