//! Attendance Recorder
//!
//! A mark is only accepted while an ACTIVE assignment covers the
//! (employee, company, date) triple. Marks are upserted per (employee,
//! date): re-marking the same day overwrites in place, last write wins.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Attendance, AttendanceMark, AttendanceTotals, MarkResult, User};
use crate::db::repository::{
    AssignmentRepository, AttendanceRepository, UserRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult, SharedClock, time};

pub struct AttendanceService {
    attendance: AttendanceRepository,
    assignments: AssignmentRepository,
    users: UserRepository,
    clock: SharedClock,
}

impl AttendanceService {
    pub fn new(db: Surreal<Db>, clock: SharedClock) -> Self {
        Self {
            attendance: AttendanceRepository::new(db.clone()),
            assignments: AssignmentRepository::new(db.clone()),
            users: UserRepository::new(db),
            clock,
        }
    }

    fn today_millis(&self) -> i64 {
        time::normalize_to_utc_midnight(self.clock.now_millis())
    }

    /// Mark attendance for an employee on a date.
    ///
    /// The date is normalized to UTC midnight before validation and
    /// storage. Returns the stored record plus a created-vs-updated flag
    /// so callers can word their confirmation correctly.
    pub async fn mark(&self, data: AttendanceMark, supervisor_id: &str) -> AppResult<MarkResult> {
        let employee = parse_record_id(&data.employee_id, "user")?;
        let company = parse_record_id(&data.company_id, "company")?;
        let supervisor = parse_record_id(supervisor_id, "user")?;
        let date = time::day_start_millis(time::parse_date(&data.date)?);

        let covering = self
            .assignments
            .find_active_covering(&employee, Some(&company), date)
            .await?;
        if covering.is_none() {
            return Err(AppError::validation(
                "Employee not assigned to this company on the selected date".to_string(),
            ));
        }

        let now = self.clock.now_millis();
        match self
            .attendance
            .find_by_employee_and_date(&employee, date)
            .await?
        {
            Some(existing) => {
                let id = existing
                    .id
                    .clone()
                    .ok_or_else(|| AppError::internal("Attendance record without id"))?;
                let record = self
                    .attendance
                    .overwrite(
                        &id,
                        data.status,
                        data.remarks,
                        data.check_in_time,
                        data.check_out_time,
                        now,
                    )
                    .await?;
                tracing::debug!("Attendance updated: {} on {}", employee, data.date);
                Ok(MarkResult {
                    record,
                    created: false,
                })
            }
            None => {
                let record = self
                    .attendance
                    .create(
                        employee.clone(),
                        company,
                        date,
                        data.status,
                        data.remarks,
                        data.check_in_time,
                        data.check_out_time,
                        Some(supervisor),
                        now,
                    )
                    .await?;
                tracing::debug!("Attendance marked: {} on {}", employee, data.date);
                Ok(MarkResult {
                    record,
                    created: true,
                })
            }
        }
    }

    /// Employees actively assigned to the company on `date` (default
    /// today) who do not yet have an attendance record for that date
    pub async fn unmarked_employees(
        &self,
        company_id: &str,
        date: Option<&str>,
    ) -> AppResult<Vec<User>> {
        let company = parse_record_id(company_id, "company")?;
        let date = match date {
            Some(d) => time::day_start_millis(time::parse_date(d)?),
            None => self.today_millis(),
        };

        let marked: std::collections::HashSet<String> = self
            .attendance
            .find_by_company_and_date(&company, date)
            .await?
            .into_iter()
            .map(|r| r.employee.to_string())
            .collect();

        let assignments = self
            .assignments
            .find_active_for_company(&company, date)
            .await?;

        let mut unmarked = Vec::new();
        for assignment in assignments {
            if marked.contains(&assignment.employee.to_string()) {
                continue;
            }
            if let Some(user) = self.users.find_by_record_id(&assignment.employee).await? {
                unmarked.push(user);
            }
        }
        Ok(unmarked)
    }

    /// Attendance history for an employee, optionally windowed to a
    /// calendar month, newest first
    pub async fn for_employee(
        &self,
        employee_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Attendance>> {
        let employee = parse_record_id(employee_id, "user")?;
        match (month, year) {
            (Some(month), Some(year)) => {
                let (start, end) = time::month_window(month, year)?;
                Ok(self
                    .attendance
                    .find_by_employee_in_window(&employee, None, start, end)
                    .await?)
            }
            (None, None) => Ok(self.attendance.find_by_employee(&employee).await?),
            _ => Err(AppError::validation(
                "Month and year must be supplied together".to_string(),
            )),
        }
    }

    /// Records a supervisor marked today
    pub async fn marked_today_by(&self, supervisor_id: &str) -> AppResult<Vec<Attendance>> {
        let supervisor = parse_record_id(supervisor_id, "user")?;
        Ok(self
            .attendance
            .find_by_supervisor_and_date(&supervisor, self.today_millis())
            .await?)
    }

    /// Per-status counts for an employee's month, optionally scoped to
    /// one company (shared payroll input)
    pub async fn totals_for_month(
        &self,
        employee: &RecordId,
        company: Option<&RecordId>,
        month: u32,
        year: i32,
    ) -> AppResult<AttendanceTotals> {
        let (start, end) = time::month_window(month, year)?;
        let records = self
            .attendance
            .find_by_employee_in_window(employee, company, start, end)
            .await?;
        Ok(AttendanceTotals::tally(records.iter()))
    }
}
