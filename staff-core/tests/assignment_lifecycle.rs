//! Assignment lifecycle: interval invariant, completion, expiry sweep,
//! and the free/active employee views.

mod common;

use staff_core::{AppError, AssignmentQuery, AssignmentStatus, AssignmentUpdate};

use common::{
    assignment_payload, company_id_of, core_with_clock, id_of, seed_admin, seed_company,
    seed_employee,
};

#[tokio::test]
async fn overlapping_assignment_is_rejected() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company_a = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_b = seed_company(&state, "Globex", "globex@staffcore.test").await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;

    let engine = state.assignments();
    engine
        .create(
            assignment_payload(&employee, &company_a, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;

    // Any intersection with an active interval conflicts, even at a
    // different company
    let err = engine
        .create(
            assignment_payload(&employee, &company_b, "2025-06-15", "2025-07-15", 500.0),
            &admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Single-day touch at the boundary still counts as overlap
    let err = engine
        .create(
            assignment_payload(&employee, &company_b, "2025-06-30", "2025-07-10", 500.0),
            &admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // A disjoint interval is fine
    let detail = engine
        .create(
            assignment_payload(&employee, &company_b, "2025-07-01", "2025-07-31", 500.0),
            &admin,
        )
        .await?;
    assert_eq!(detail.assignment.status, AssignmentStatus::Active);
    Ok(())
}

#[tokio::test]
async fn create_validates_interval_and_parties() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;

    let engine = state.assignments();

    // end must be strictly after start
    let err = engine
        .create(
            assignment_payload(&employee, &company, "2025-06-10", "2025-06-10", 450.0),
            &admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // unknown employee
    let mut payload = assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0);
    payload.employee_id = "user:doesnotexist".into();
    let err = engine.create(payload, &admin).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // non-employee roles cannot be assigned
    let mut payload = assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0);
    payload.employee_id = admin.clone();
    let err = engine.create(payload, &admin).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn completion_resyncs_the_company_pointer() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;
    let employee_id = id_of(&employee);

    let engine = state.assignments();
    let detail = engine
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;

    // Creation attaches the employee to the company
    let attached = state.users().get(&employee_id).await?;
    assert_eq!(
        attached.company_id.as_ref().map(|id| id.to_string()),
        Some(company_id_of(&company))
    );
    assert_eq!(attached.company_code, Some(company.company_code.clone()));

    let assignment_id = detail.assignment.id.expect("assignment id").to_string();
    let covering = engine.covering_assignment(&employee_id, None, None).await?;
    assert_eq!(
        covering.and_then(|a| a.id).map(|id| id.to_string()),
        Some(assignment_id.clone())
    );

    let completed = engine.complete(&assignment_id).await?;
    assert_eq!(completed.status, AssignmentStatus::Completed);

    // Completing today clamps the end date to today (2025-06-02)
    assert_eq!(completed.end_date, 1_748_822_400_000);

    // No remaining active assignment: pointer cleared, nothing covers today
    let freed = state.users().get(&employee_id).await?;
    assert!(freed.company_id.is_none());
    assert!(freed.company_code.is_none());
    assert!(engine.covering_assignment(&employee_id, None, None).await?.is_none());

    // Completing twice is a business rule violation
    let err = engine.complete(&assignment_id).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn status_machine_blocks_reactivation() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;

    let engine = state.assignments();
    let detail = engine
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;
    let assignment_id = detail.assignment.id.expect("assignment id").to_string();

    let cancelled = engine
        .update(
            &assignment_id,
            AssignmentUpdate {
                status: Some(AssignmentStatus::Cancelled),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(cancelled.status, AssignmentStatus::Cancelled);

    // Terminal states never go back to active
    let err = engine
        .update(
            &assignment_id,
            AssignmentUpdate {
                status: Some(AssignmentStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn sweep_completes_expired_assignments_once() -> anyhow::Result<()> {
    let (state, clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;
    let employee_id = id_of(&employee);

    let engine = state.assignments();
    engine
        .create(
            assignment_payload(&employee, &company, "2025-06-01", "2025-06-10", 450.0),
            &admin,
        )
        .await?;

    // Still running on 2025-06-02: nothing to sweep
    assert_eq!(engine.sweep_expired().await?, 0);

    // An assignment ending today is not expired yet
    clock.set(1_749_513_600_000 + 43_200_000); // 2025-06-10T12:00:00Z
    assert_eq!(engine.sweep_expired().await?, 0);

    clock.advance_days(10); // 2025-06-20
    assert_eq!(engine.sweep_expired().await?, 1);

    // The original end date is preserved, not clamped to sweep day
    let swept = engine
        .list(AssignmentQuery {
            employee_id: Some(employee_id.clone()),
            ..Default::default()
        })
        .await?;
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].status, AssignmentStatus::Completed);
    assert_eq!(swept[0].end_date, 1_749_513_600_000); // 2025-06-10

    // Pointer dropped, employee free again
    let freed = state.users().get(&employee_id).await?;
    assert!(freed.company_id.is_none());

    // Idempotent
    assert_eq!(engine.sweep_expired().await?, 0);
    Ok(())
}

#[tokio::test]
async fn free_and_active_views_partition_employees() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let assigned = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;
    let idle = seed_employee(&state, "Meena Iyer", "meena@staffcore.test", None).await;

    let engine = state.assignments();
    let detail = engine
        .create(
            assignment_payload(&assigned, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;

    let free = engine.free_employees().await?;
    let free_ids: Vec<String> = free.iter().map(id_of).collect();
    assert!(free_ids.contains(&id_of(&idle)));
    assert!(!free_ids.contains(&id_of(&assigned)));

    let active = engine.active_employees(&company_id_of(&company)).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].employee.name, "Ravi Kumar");
    assert_eq!(active[0].daily_salary, 450.0);
    assert_eq!(active[0].assignment_id, detail.assignment.id.expect("id"));

    // A future assignment does not make the idle employee active today
    engine
        .create(
            assignment_payload(&idle, &company, "2025-07-01", "2025-07-15", 400.0),
            &admin,
        )
        .await?;
    let active = engine.active_employees(&company_id_of(&company)).await?;
    assert_eq!(active.len(), 1);
    Ok(())
}
