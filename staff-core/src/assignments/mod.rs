//! Assignment Engine
//!
//! Owns the assignment lifecycle: creation with the interval non-overlap
//! invariant, partial updates, explicit completion, the expiry sweep, and
//! the free/active employee queries. Every mutation re-syncs the
//! employee's denormalized current-company pointer so the display cache
//! on the user record tracks the authoritative assignment table.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    ActiveEmployee, Assignment, AssignmentCreate, AssignmentDetail, AssignmentStatus,
    AssignmentUpdate, Role, User,
};
use crate::db::repository::assignment::AssignmentFilter;
use crate::db::repository::{
    AssignmentRepository, CompanyRepository, UserRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult, SharedClock, time};

/// String-keyed listing filter for external callers
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub employee_id: Option<String>,
    pub company_id: Option<String>,
    pub status: Option<AssignmentStatus>,
}

pub struct AssignmentEngine {
    assignments: AssignmentRepository,
    users: UserRepository,
    companies: CompanyRepository,
    clock: SharedClock,
}

impl AssignmentEngine {
    pub fn new(db: Surreal<Db>, clock: SharedClock) -> Self {
        Self {
            assignments: AssignmentRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            companies: CompanyRepository::new(db),
            clock,
        }
    }

    /// UTC midnight of the clock's current date
    fn today_millis(&self) -> i64 {
        time::normalize_to_utc_midnight(self.clock.now_millis())
    }

    /// Create an ACTIVE assignment binding an employee to a company.
    ///
    /// Rejects when the employee/company is missing, the interval is not
    /// strictly end-after-start, or any ACTIVE assignment of the employee
    /// overlaps the requested interval.
    pub async fn create(&self, data: AssignmentCreate, actor_id: &str) -> AppResult<AssignmentDetail> {
        let employee_id = parse_record_id(&data.employee_id, "user")?;
        let employee = self
            .users
            .find_by_record_id(&employee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", data.employee_id)))?;
        if employee.role != Role::Employee {
            return Err(AppError::validation(format!(
                "User {} is not an employee",
                data.employee_id
            )));
        }

        let company_id = parse_record_id(&data.company_id, "company")?;
        let company = self
            .companies
            .find_by_record_id(&company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Company {} not found", data.company_id)))?;

        let assigned_by = parse_record_id(actor_id, "user")?;

        let start = time::day_start_millis(time::parse_date(&data.start_date)?);
        let end = time::day_start_millis(time::parse_date(&data.end_date)?);
        if end <= start {
            return Err(AppError::validation(
                "End date must be after start date".to_string(),
            ));
        }

        let overlapping = self
            .assignments
            .find_active_overlapping(&employee_id, start, end)
            .await?;
        if !overlapping.is_empty() {
            return Err(AppError::conflict(
                "Employee already has an overlapping assignment".to_string(),
            ));
        }

        let assignment = self
            .assignments
            .create(
                employee_id.clone(),
                company_id.clone(),
                start,
                end,
                data.daily_salary,
                data.notes,
                assigned_by,
                self.clock.now_millis(),
            )
            .await?;

        // A free employee becomes attached to this company
        self.users
            .set_company_link(
                &employee_id,
                Some((company_id, company.company_code.clone())),
            )
            .await?;

        tracing::info!(
            "Assignment created: employee={} company={} [{} - {}]",
            employee_id,
            company.company_code,
            data.start_date,
            data.end_date
        );

        Ok(AssignmentDetail {
            assignment,
            employee: employee.summary(),
            company: company.summary(),
        })
    }

    /// Partially update an assignment.
    ///
    /// Date edits are NOT re-checked against the overlap invariant here,
    /// a known inconsistency with `create`. Status edits must follow the
    /// ACTIVE -> COMPLETED / CANCELLED state machine.
    pub async fn update(&self, id: &str, data: AssignmentUpdate) -> AppResult<Assignment> {
        let existing = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Assignment {} not found", id)))?;
        let record_id = existing
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Assignment record without id"))?;

        if let Some(status) = data.status
            && !existing.status.can_transition_to(status)
        {
            return Err(AppError::business_rule(format!(
                "Cannot change a {:?} assignment to {:?}",
                existing.status, status
            )));
        }

        let start = match data.start_date.as_deref() {
            Some(d) => Some(time::day_start_millis(time::parse_date(d)?)),
            None => None,
        };
        let end = match data.end_date.as_deref() {
            Some(d) => Some(time::day_start_millis(time::parse_date(d)?)),
            None => None,
        };

        let updated = self
            .assignments
            .update_fields(
                &record_id,
                start,
                end,
                data.daily_salary,
                data.notes,
                data.status,
                self.clock.now_millis(),
            )
            .await?;

        if updated.status == AssignmentStatus::Active {
            // Force the pointer onto this assignment's company
            self.link_employee_to(&updated.employee, &updated.company)
                .await?;
        } else {
            self.resync_employee_company(&updated.employee).await?;
        }

        Ok(updated)
    }

    /// Complete an assignment now: status COMPLETED, end date today
    pub async fn complete(&self, id: &str) -> AppResult<Assignment> {
        let existing = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Assignment {} not found", id)))?;
        let record_id = existing
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Assignment record without id"))?;

        if existing.status != AssignmentStatus::Active {
            return Err(AppError::business_rule(format!(
                "Only active assignments can be completed (status: {:?})",
                existing.status
            )));
        }

        let completed = self
            .assignments
            .mark_completed(&record_id, self.today_millis(), self.clock.now_millis())
            .await?;
        self.resync_employee_company(&completed.employee).await?;

        tracing::info!("Assignment completed: {}", record_id);
        Ok(completed)
    }

    /// The ACTIVE assignment covering a date for an employee, optionally
    /// restricted to one company. Defaults to today when no date is given.
    pub async fn covering_assignment(
        &self,
        employee_id: &str,
        company_id: Option<&str>,
        date: Option<&str>,
    ) -> AppResult<Option<Assignment>> {
        let employee = parse_record_id(employee_id, "user")?;
        let company = match company_id {
            Some(id) => Some(parse_record_id(id, "company")?),
            None => None,
        };
        let date = match date {
            Some(d) => time::day_start_millis(time::parse_date(d)?),
            None => self.today_millis(),
        };
        Ok(self
            .assignments
            .find_active_covering(&employee, company.as_ref(), date)
            .await?)
    }

    /// List assignments matching the query, newest interval first
    pub async fn list(&self, query: AssignmentQuery) -> AppResult<Vec<Assignment>> {
        let filter = AssignmentFilter {
            employee: match query.employee_id.as_deref() {
                Some(id) => Some(parse_record_id(id, "user")?),
                None => None,
            },
            company: match query.company_id.as_deref() {
                Some(id) => Some(parse_record_id(id, "company")?),
                None => None,
            },
            status: query.status,
        };
        Ok(self.assignments.find_all(filter).await?)
    }

    /// Active employees with no ACTIVE assignment covering today
    pub async fn free_employees(&self) -> AppResult<Vec<User>> {
        let today = self.today_millis();
        let bound: std::collections::HashSet<String> = self
            .assignments
            .employees_with_active_covering(today)
            .await?
            .into_iter()
            .map(|id| id.to_string())
            .collect();

        let employees = self.users.find_by_role(Role::Employee).await?;
        Ok(employees
            .into_iter()
            .filter(|e| {
                e.id.as_ref()
                    .map(|id| !bound.contains(&id.to_string()))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Employees actively assigned to a company today, annotated with the
    /// covering assignment
    pub async fn active_employees(&self, company_id: &str) -> AppResult<Vec<ActiveEmployee>> {
        let company = parse_record_id(company_id, "company")?;
        let today = self.today_millis();
        let assignments = self
            .assignments
            .find_active_for_company(&company, today)
            .await?;

        let mut result = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let Some(assignment_id) = assignment.id.clone() else {
                continue;
            };
            let Some(user) = self.users.find_by_record_id(&assignment.employee).await? else {
                continue;
            };
            result.push(ActiveEmployee {
                employee: user.summary(),
                assignment_id,
                daily_salary: assignment.daily_salary,
                start_date: assignment.start_date,
                end_date: assignment.end_date,
            });
        }
        Ok(result)
    }

    /// Auto-complete every ACTIVE assignment whose end date has passed.
    ///
    /// Idempotent: completed assignments drop out of the expiry query, so
    /// a second sweep over the same data is a no-op. Returns the number
    /// of assignments flipped. Not self-scheduling — callers invoke this
    /// from a timer or lazily before relevant reads.
    pub async fn sweep_expired(&self) -> AppResult<u32> {
        let cutoff = self.today_millis();
        let expired = self.assignments.find_expired_active(cutoff).await?;
        if expired.is_empty() {
            tracing::debug!("No expired assignments to sweep");
            return Ok(0);
        }

        let mut flipped = 0u32;
        for assignment in expired {
            let Some(id) = assignment.id.clone() else {
                continue;
            };
            self.assignments
                .mark_completed(&id, assignment.end_date, self.clock.now_millis())
                .await?;
            self.resync_employee_company(&assignment.employee).await?;
            flipped += 1;
        }
        tracing::info!("Sweep completed {} expired assignment(s)", flipped);
        Ok(flipped)
    }

    /// Point the employee's display cache at whichever assignment is
    /// ACTIVE and covering today, or clear it when none is
    pub(crate) async fn resync_employee_company(&self, employee: &RecordId) -> AppResult<()> {
        let today = self.today_millis();
        match self
            .assignments
            .find_active_covering(employee, None, today)
            .await?
        {
            Some(active) => self.link_employee_to(employee, &active.company).await,
            None => {
                self.users.set_company_link(employee, None).await?;
                Ok(())
            }
        }
    }

    async fn link_employee_to(&self, employee: &RecordId, company: &RecordId) -> AppResult<()> {
        let company_code = self
            .companies
            .find_by_record_id(company)
            .await?
            .map(|c| c.company_code)
            .unwrap_or_default();
        self.users
            .set_company_link(employee, Some((company.clone(), company_code)))
            .await?;
        Ok(())
    }
}
