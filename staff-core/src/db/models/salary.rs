//! Salary Model
//!
//! One payslip per (employee, month, year) in fixed-structure mode, or
//! per (employee, company, month, year) in daily-rate mode. Regeneration
//! for the same period replaces the stored values (upsert, never
//! accumulate).

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::AttendanceTotals;
use super::serde_helpers;

/// Salary ID type
pub type SalaryId = RecordId;

/// Payslip lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryStatus {
    #[default]
    Pending,
    Generated,
    Paid,
}

/// Calculation-mode-specific payslip figures
///
/// Modeled as one tagged sum type instead of two parallel record shapes;
/// the `mode` tag tells consumers which fields are present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryBreakdown {
    /// Computed from the employee's fixed monthly salary structure
    FixedStructure {
        gross_salary: f64,
        per_day_salary: f64,
        total_working_days: u32,
        monthly_earnings: f64,
        pf_deduction: f64,
        esi_deduction: f64,
        net_salary: f64,
    },
    /// Computed from an assignment's daily rate
    DailyRate {
        daily_rate: f64,
        total_earnings: f64,
    },
}

/// Salary entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SalaryId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    /// Present only for daily-rate payslips
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub company: Option<RecordId>,
    pub month: u32,
    pub year: i32,
    #[serde(flatten)]
    pub breakdown: SalaryBreakdown,
    pub totals: AttendanceTotals,
    /// present + paid leaves + half days * 0.5
    pub days_worked: f64,
    #[serde(default)]
    pub status: SalaryStatus,
    pub generated_at: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Per-employee outcome of a bulk generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOutcome {
    Created,
    Updated,
    Failed { reason: String },
}

/// One employee's entry in a bulk generation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkEntry {
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    pub employee_name: String,
    #[serde(flatten)]
    pub outcome: BulkOutcome,
}

/// Report for a company-wide bulk generation; one employee's failure
/// never aborts the batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    pub created: u32,
    pub updated: u32,
    pub failed: u32,
    #[serde(default)]
    pub entries: Vec<BulkEntry>,
}

impl BulkReport {
    pub fn push(&mut self, entry: BulkEntry) {
        match entry.outcome {
            BulkOutcome::Created => self.created += 1,
            BulkOutcome::Updated => self.updated += 1,
            BulkOutcome::Failed { .. } => self.failed += 1,
        }
        self.entries.push(entry);
    }
}
