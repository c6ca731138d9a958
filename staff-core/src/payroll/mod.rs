//! Payroll Service
//!
//! Turns attendance aggregates plus a pay-rate source into payslips.
//! Two calculation modes share one engine: Mode A consumes the
//! employee's fixed monthly salary structure, Mode B an assignment's
//! daily rate. Generation is idempotent per period — rerunning replaces
//! the stored payslip instead of accumulating records.

pub mod calculator;


use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    AssignmentStatus, AttendanceTotals, BulkEntry, BulkOutcome, BulkReport, Role, Salary,
    SalaryStatus, User,
};
use crate::db::repository::salary::{SalaryFilter, SalaryWrite};
use crate::db::repository::{
    AssignmentRepository, AttendanceRepository, SalaryRepository, UserRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult, SharedClock, time};

/// Outcome of one salary generation call
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub salary: Salary,
    /// False when an existing payslip for the period was replaced
    pub created: bool,
}

/// String-keyed listing filter for external callers
#[derive(Debug, Clone, Default)]
pub struct SalaryQuery {
    pub employee_id: Option<String>,
    pub company_id: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<SalaryStatus>,
}

pub struct PayrollService {
    salaries: SalaryRepository,
    attendance: AttendanceRepository,
    assignments: AssignmentRepository,
    users: UserRepository,
    clock: SharedClock,
}

impl PayrollService {
    pub fn new(db: Surreal<Db>, clock: SharedClock) -> Self {
        Self {
            salaries: SalaryRepository::new(db.clone()),
            attendance: AttendanceRepository::new(db.clone()),
            assignments: AssignmentRepository::new(db.clone()),
            users: UserRepository::new(db),
            clock,
        }
    }

    /// Mode A: generate from the employee's fixed monthly structure.
    ///
    /// Keyed on (employee, month, year); company-independent.
    pub async fn generate_fixed_structure(
        &self,
        employee_id: &str,
        month: u32,
        year: i32,
        total_working_days: u32,
    ) -> AppResult<GenerationResult> {
        let employee_rid = parse_record_id(employee_id, "user")?;
        let employee = self
            .users
            .find_by_record_id(&employee_rid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))?;
        self.generate_fixed_for_user(&employee, month, year, total_working_days)
            .await
    }

    async fn generate_fixed_for_user(
        &self,
        employee: &User,
        month: u32,
        year: i32,
        total_working_days: u32,
    ) -> AppResult<GenerationResult> {
        if employee.role != Role::Employee {
            return Err(AppError::validation(format!(
                "User {} is not an employee",
                employee.email
            )));
        }
        let structure = employee.salary_structure.as_ref().ok_or_else(|| {
            AppError::validation(format!(
                "Employee {} has no salary structure",
                employee.email
            ))
        })?;
        let employee_rid = employee
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record without id"))?;

        let totals = self
            .totals_for(&employee_rid, None, month, year)
            .await?;
        let breakdown =
            calculator::calculate_fixed_structure(structure, &totals, total_working_days)?;

        let now = self.clock.now_millis();
        let (salary, created) = self
            .salaries
            .upsert(SalaryWrite {
                employee: employee_rid,
                company: None,
                month,
                year,
                breakdown,
                totals,
                days_worked: calculator::days_worked(&totals),
                status: SalaryStatus::Generated,
                generated_at: now,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(
            "Salary generated (fixed structure): {} {}/{} created={}",
            employee.email,
            month,
            year,
            created
        );
        Ok(GenerationResult { salary, created })
    }

    /// Mode B: generate from an assignment's daily rate.
    ///
    /// Keyed on (employee, company, month, year); the referenced
    /// assignment must currently be ACTIVE.
    pub async fn generate_from_assignment(
        &self,
        employee_id: &str,
        company_id: &str,
        assignment_id: &str,
        month: u32,
        year: i32,
    ) -> AppResult<GenerationResult> {
        let employee = parse_record_id(employee_id, "user")?;
        let company = parse_record_id(company_id, "company")?;

        let assignment = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Assignment {} not found", assignment_id))
            })?;
        if assignment.employee != employee || assignment.company != company {
            return Err(AppError::validation(
                "Assignment does not bind this employee to this company".to_string(),
            ));
        }
        if assignment.status != AssignmentStatus::Active {
            return Err(AppError::business_rule(format!(
                "Cannot generate salary against a {:?} assignment",
                assignment.status
            )));
        }

        let totals = self
            .totals_for(&employee, Some(&company), month, year)
            .await?;
        let breakdown = calculator::calculate_daily_rate(assignment.daily_salary, &totals);

        let now = self.clock.now_millis();
        let (salary, created) = self
            .salaries
            .upsert(SalaryWrite {
                employee,
                company: Some(company),
                month,
                year,
                breakdown,
                totals,
                days_worked: calculator::days_worked(&totals),
                status: SalaryStatus::Generated,
                generated_at: now,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(
            "Salary generated (daily rate): employee={} {}/{} created={}",
            employee_id,
            month,
            year,
            created
        );
        Ok(GenerationResult { salary, created })
    }

    /// Bulk Mode A over every active employee linked to a company.
    ///
    /// One employee's failure is recorded in the report and never aborts
    /// the batch.
    pub async fn bulk_generate_fixed_structure(
        &self,
        company_id: &str,
        month: u32,
        year: i32,
        total_working_days: u32,
    ) -> AppResult<BulkReport> {
        let company = parse_record_id(company_id, "company")?;
        let employees = self.users.find_employees_of_company(&company).await?;

        let mut report = BulkReport::default();
        for employee in employees {
            let Some(id) = employee.id.clone() else {
                continue;
            };
            let entry = match self
                .generate_fixed_for_user(&employee, month, year, total_working_days)
                .await
            {
                Ok(result) => BulkEntry {
                    employee: id,
                    employee_name: employee.name.clone(),
                    outcome: if result.created {
                        BulkOutcome::Created
                    } else {
                        BulkOutcome::Updated
                    },
                },
                Err(e) => {
                    tracing::warn!("Bulk salary skipped {}: {}", employee.email, e);
                    BulkEntry {
                        employee: id,
                        employee_name: employee.name.clone(),
                        outcome: BulkOutcome::Failed {
                            reason: e.to_string(),
                        },
                    }
                }
            };
            report.push(entry);
        }

        tracing::info!(
            "Bulk salary generation for {}: {} created, {} updated, {} failed",
            company_id,
            report.created,
            report.updated,
            report.failed
        );
        Ok(report)
    }

    /// List payslips matching the query, newest period first
    pub async fn list(&self, query: SalaryQuery) -> AppResult<Vec<Salary>> {
        let filter = SalaryFilter {
            employee: match query.employee_id.as_deref() {
                Some(id) => Some(parse_record_id(id, "user")?),
                None => None,
            },
            company: match query.company_id.as_deref() {
                Some(id) => Some(parse_record_id(id, "company")?),
                None => None,
            },
            month: query.month,
            year: query.year,
            status: query.status,
        };
        Ok(self.salaries.find_all(filter).await?)
    }

    /// All payslips of one employee, newest period first
    pub async fn payslips_for_employee(&self, employee_id: &str) -> AppResult<Vec<Salary>> {
        let employee = parse_record_id(employee_id, "user")?;
        Ok(self.salaries.find_by_employee(&employee).await?)
    }

    /// Mark a generated payslip as paid
    pub async fn mark_paid(&self, salary_id: &str) -> AppResult<Salary> {
        let id = parse_record_id(salary_id, "salary")?;
        Ok(self.salaries.set_status(&id, SalaryStatus::Paid).await?)
    }

    async fn totals_for(
        &self,
        employee: &surrealdb::RecordId,
        company: Option<&surrealdb::RecordId>,
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
