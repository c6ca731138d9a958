//! Salary Calculator
//!
//! Pure payslip math for both calculation modes. Uses rust_decimal for
//! precise calculations, stores as f64: intermediate values keep full
//! precision and every output figure is rounded independently at the
//! edge (2 decimal places, half-up).

use rust_decimal::prelude::*;

use crate::db::models::{AttendanceTotals, SalaryBreakdown, SalaryStructure};
use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Statutory PF rate (12%) applied to basic salary when no explicit amount is set
fn pf_rate() -> Decimal {
    Decimal::new(12, 2)
}

/// Statutory ESI rate (0.75%) applied to gross salary when no explicit amount is set
fn esi_rate() -> Decimal {
    Decimal::new(75, 4)
}

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Days worked from per-status counts: present + paid leaves + half days * 0.5
pub fn days_worked(totals: &AttendanceTotals) -> f64 {
    f64::from(totals.present_days) + f64::from(totals.paid_leaves) + f64::from(totals.half_days) * 0.5
}

fn days_worked_decimal(totals: &AttendanceTotals) -> Decimal {
    Decimal::from(totals.present_days)
        + Decimal::from(totals.paid_leaves)
        + Decimal::from(totals.half_days) / Decimal::TWO
}

/// Mode A: payslip from a fixed monthly salary structure.
///
/// Deterministic: identical inputs always produce identical figures.
pub fn calculate_fixed_structure(
    structure: &SalaryStructure,
    totals: &AttendanceTotals,
    total_working_days: u32,
) -> AppResult<SalaryBreakdown> {
    if total_working_days == 0 {
        return Err(AppError::validation(
            "Total working days must be greater than zero".to_string(),
        ));
    }

    let basic = to_decimal(structure.basic_salary);
    let gross = basic + to_decimal(structure.hra) + to_decimal(structure.allowances);
    let per_day = gross / Decimal::from(total_working_days);
    let worked = days_worked_decimal(totals);
    let earnings = per_day * worked;

    let pf = if structure.pf_applicable {
        if structure.pf_amount > 0.0 {
            to_decimal(structure.pf_amount)
        } else {
            basic * pf_rate()
        }
    } else {
        Decimal::ZERO
    };

    let esi = if structure.esi_applicable {
        if structure.esi_amount > 0.0 {
            to_decimal(structure.esi_amount)
        } else {
            gross * esi_rate()
        }
    } else {
        Decimal::ZERO
    };

    let net = earnings - (pf + esi);

    Ok(SalaryBreakdown::FixedStructure {
        gross_salary: to_f64(gross),
        per_day_salary: to_f64(per_day),
        total_working_days,
        monthly_earnings: to_f64(earnings),
        pf_deduction: to_f64(pf),
        esi_deduction: to_f64(esi),
        net_salary: to_f64(net),
    })
}

/// Mode B: payslip from an assignment's daily rate
pub fn calculate_daily_rate(daily_rate: f64, totals: &AttendanceTotals) -> SalaryBreakdown {
    let earnings = to_decimal(daily_rate) * days_worked_decimal(totals);
    SalaryBreakdown::DailyRate {
        daily_rate,
        total_earnings: to_f64(earnings),
    }
}
