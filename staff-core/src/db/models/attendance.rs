//! Attendance Model
//!
//! One record per (employee, date); the date is stored as UTC-midnight
//! millis so same-day marks from any timezone offset collide and
//! overwrite in place (last write wins, no history).

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Attendance ID type
pub type AttendanceId = RecordId;

/// Attendance status
///
/// Closed enum: an unknown status string fails deserialization at the
/// boundary instead of silently dropping out of the payroll buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
}

/// Attendance entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AttendanceId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub company: RecordId,
    /// UTC midnight millis
    pub date: i64,
    pub status: AttendanceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub remarks: Option<String>,
    /// Supervisor who first marked the record
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub supervisor: Option<RecordId>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Mark attendance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub employee_id: String,
    pub company_id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

/// Result of a mark operation; callers use `created` to distinguish
/// "marked" from "updated" messaging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkResult {
    pub record: Attendance,
    pub created: bool,
}

/// Per-status counts for a period (shared payroll input)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceTotals {
    pub present_days: u32,
    pub half_days: u32,
    pub paid_leaves: u32,
    pub absent_days: u32,
}

impl AttendanceTotals {
    /// Tally a batch of records into per-status buckets
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a Attendance>) -> Self {
        let mut totals = Self::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => totals.present_days += 1,
                AttendanceStatus::HalfDay => totals.half_days += 1,
                AttendanceStatus::Leave => totals.paid_leaves += 1,
                AttendanceStatus::Absent => totals.absent_days += 1,
            }
        }
        totals
    }
}
