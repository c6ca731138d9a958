//! Assignment Model
//!
//! Time-bounded binding of one employee to one company with an agreed
//! daily pay rate. For any employee, at most one ACTIVE assignment may
//! cover a given date (interval non-overlap invariant, enforced by the
//! assignment engine at creation).

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::{CompanySummary, UserSummary};

/// Assignment ID type
pub type AssignmentId = RecordId;

/// Assignment status
///
/// Transitions: ACTIVE -> COMPLETED (explicit complete, sweep, or status
/// update) and ACTIVE -> CANCELLED (explicit status update). COMPLETED
/// and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    /// Whether a transition from `self` to `to` is allowed
    pub fn can_transition_to(self, to: AssignmentStatus) -> bool {
        match (self, to) {
            (a, b) if a == b => true,
            (AssignmentStatus::Active, _) => true,
            _ => false,
        }
    }
}

/// Assignment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AssignmentId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub company: RecordId,
    /// UTC midnight millis, inclusive
    pub start_date: i64,
    /// UTC midnight millis, inclusive
    pub end_date: i64,
    pub daily_salary: f64,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Admin user who created the binding
    #[serde(with = "serde_helpers::record_id")]
    pub assigned_by: RecordId,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Assignment {
    /// Whether the interval contains the given UTC-midnight date
    pub fn covers(&self, date_millis: i64) -> bool {
        self.start_date <= date_millis && date_millis <= self.end_date
    }
}

/// Inclusive interval overlap test shared by the engine's checks
pub fn intervals_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Create assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub employee_id: String,
    pub company_id: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
    pub daily_salary: f64,
    pub notes: Option<String>,
}

/// Update assignment payload (absent fields left untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
}

/// Assignment with populated employee/company summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDetail {
    pub assignment: Assignment,
    pub employee: UserSummary,
    pub company: CompanySummary,
}

/// Employee annotated with the assignment that makes them active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEmployee {
    pub employee: UserSummary,
    #[serde(with = "serde_helpers::record_id")]
    pub assignment_id: AssignmentId,
    pub daily_salary: f64,
    pub start_date: i64,
    pub end_date: i64,
}
