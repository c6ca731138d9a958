//! Payroll generation: fixed-structure and daily-rate modes, period
//! uniqueness under regeneration, and company-wide bulk runs.

mod common;

use staff_core::{AppError, AttendanceMark, AttendanceStatus, SalaryBreakdown, SalaryQuery, SalaryStatus};

use common::{
    assignment_payload, company_id_of, core_with_clock, id_of, reference_structure, seed_admin,
    seed_company, seed_employee, seed_supervisor,
};

async fn mark(
    state: &staff_core::CoreState,
    employee_id: &str,
    company_id: &str,
    supervisor_id: &str,
    day: u32,
    status: AttendanceStatus,
) -> anyhow::Result<()> {
    state
        .attendance()
        .mark(
            AttendanceMark {
                employee_id: employee_id.into(),
                company_id: company_id.into(),
                date: format!("2025-06-{day:02}"),
                status,
                remarks: None,
                check_in_time: None,
                check_out_time: None,
            },
            supervisor_id,
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn fixed_structure_payslip_matches_reference_figures() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);
    let supervisor = seed_supervisor(&state, "super@staffcore.test", &company_id).await;
    let supervisor_id = id_of(&supervisor);
    let employee = seed_employee(
        &state,
        "Ravi Kumar",
        "ravi@staffcore.test",
        Some(reference_structure()),
    )
    .await;
    let employee_id = id_of(&employee);

    state
        .assignments()
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;

    // 24 present, 1 paid leave, 1 absent over a 26-day working month
    for day in 1..=24 {
        mark(&state, &employee_id, &company_id, &supervisor_id, day, AttendanceStatus::Present)
            .await?;
    }
    mark(&state, &employee_id, &company_id, &supervisor_id, 25, AttendanceStatus::Leave).await?;
    mark(&state, &employee_id, &company_id, &supervisor_id, 26, AttendanceStatus::Absent).await?;

    let payroll = state.payroll();
    let result = payroll
        .generate_fixed_structure(&employee_id, 6, 2025, 26)
        .await?;
    assert!(result.created);

    let salary = &result.salary;
    assert_eq!(salary.status, SalaryStatus::Generated);
    assert!(salary.company.is_none());
    assert_eq!(salary.days_worked, 25.0);
    assert_eq!(salary.totals.present_days, 24);
    assert_eq!(salary.totals.paid_leaves, 1);
    assert_eq!(salary.totals.absent_days, 1);
    // Earnings carry full precision through the division before rounding
    assert_eq!(
        salary.breakdown,
        SalaryBreakdown::FixedStructure {
            gross_salary: 27_000.0,
            per_day_salary: 1_038.46,
            total_working_days: 26,
            monthly_earnings: 25_961.54,
            pf_deduction: 2_400.0,
            esi_deduction: 0.0,
            net_salary: 23_561.54,
        }
    );
    Ok(())
}

#[tokio::test]
async fn regeneration_replaces_the_period_payslip() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);
    let supervisor = seed_supervisor(&state, "super@staffcore.test", &company_id).await;
    let supervisor_id = id_of(&supervisor);
    let employee = seed_employee(
        &state,
        "Ravi Kumar",
        "ravi@staffcore.test",
        Some(reference_structure()),
    )
    .await;
    let employee_id = id_of(&employee);

    state
        .assignments()
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;
    for day in 1..=10 {
        mark(&state, &employee_id, &company_id, &supervisor_id, day, AttendanceStatus::Present)
            .await?;
    }

    let payroll = state.payroll();
    let first = payroll.generate_fixed_structure(&employee_id, 6, 2025, 26).await?;
    assert!(first.created);

    // A late correction changes the inputs, regeneration recomputes
    mark(&state, &employee_id, &company_id, &supervisor_id, 11, AttendanceStatus::Present).await?;
    let second = payroll.generate_fixed_structure(&employee_id, 6, 2025, 26).await?;
    assert!(!second.created);
    assert_eq!(second.salary.days_worked, 11.0);
    assert_eq!(second.salary.id, first.salary.id);

    let third = payroll.generate_fixed_structure(&employee_id, 6, 2025, 26).await?;
    assert!(!third.created);

    // Still exactly one payslip for the period
    let slips = payroll.payslips_for_employee(&employee_id).await?;
    assert_eq!(slips.len(), 1);
    Ok(())
}

#[tokio::test]
async fn daily_rate_payslip_needs_an_active_assignment() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);
    let supervisor = seed_supervisor(&state, "super@staffcore.test", &company_id).await;
    let supervisor_id = id_of(&supervisor);
    let employee = seed_employee(&state, "Meena Iyer", "meena@staffcore.test", None).await;
    let employee_id = id_of(&employee);

    let detail = state
        .assignments()
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 500.0),
            &admin,
        )
        .await?;
    let assignment_id = detail.assignment.id.expect("assignment id").to_string();

    // 18 full days plus 2 half days = 19 payable days
    for day in 1..=18 {
        mark(&state, &employee_id, &company_id, &supervisor_id, day, AttendanceStatus::Present)
            .await?;
    }
    for day in 19..=20 {
        mark(&state, &employee_id, &company_id, &supervisor_id, day, AttendanceStatus::HalfDay)
            .await?;
    }

    let payroll = state.payroll();
    let result = payroll
        .generate_from_assignment(&employee_id, &company_id, &assignment_id, 6, 2025)
        .await?;
    assert!(result.created);
    assert_eq!(
        result.salary.company.as_ref().map(|id| id.to_string()),
        Some(company_id.clone())
    );
    assert_eq!(result.salary.days_worked, 19.0);
    assert_eq!(
        result.salary.breakdown,
        SalaryBreakdown::DailyRate {
            daily_rate: 500.0,
            total_earnings: 9_500.0,
        }
    );

    // Closed assignments no longer generate
    state.assignments().complete(&assignment_id).await?;
    let err = payroll
        .generate_from_assignment(&employee_id, &company_id, &assignment_id, 6, 2025)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn bulk_run_reports_per_employee_outcomes() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);
    let with_structure = seed_employee(
        &state,
        "Ravi Kumar",
        "ravi@staffcore.test",
        Some(reference_structure()),
    )
    .await;
    let without_structure = seed_employee(&state, "Meena Iyer", "meena@staffcore.test", None).await;

    let engine = state.assignments();
    engine
        .create(
            assignment_payload(&with_structure, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;
    engine
        .create(
            assignment_payload(&without_structure, &company, "2025-06-01", "2025-06-30", 400.0),
            &admin,
        )
        .await?;

    let payroll = state.payroll();
    let report = payroll
        .bulk_generate_fixed_structure(&company_id, 6, 2025, 26)
        .await?;
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.entries.len(), 2);

    // Second run over unchanged data replaces instead of duplicating
    let rerun = payroll
        .bulk_generate_fixed_structure(&company_id, 6, 2025, 26)
        .await?;
    assert_eq!(rerun.created, 0);
    assert_eq!(rerun.updated, 1);
    assert_eq!(rerun.failed, 1);

    let slips = payroll
        .list(SalaryQuery {
            month: Some(6),
            year: Some(2025),
            ..Default::default()
        })
        .await?;
    assert_eq!(slips.len(), 1);
    Ok(())
}

#[tokio::test]
async fn mark_paid_advances_the_payslip_status() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let employee = seed_employee(
        &state,
        "Ravi Kumar",
        "ravi@staffcore.test",
        Some(reference_structure()),
    )
    .await;
    let employee_id = id_of(&employee);

    let payroll = state.payroll();
    let result = payroll.generate_fixed_structure(&employee_id, 6, 2025, 26).await?;
    let salary_id = result.salary.id.expect("salary id").to_string();

    let paid = payroll.mark_paid(&salary_id).await?;
    assert_eq!(paid.status, SalaryStatus::Paid);
    Ok(())
}
