//! Company registration and user administration: the owner-user pairing,
//! activation cascade, promotion and password rotation.

mod common;

use staff_core::{AppError, CompanyRegister, Role};

use common::{
    assignment_payload, company_id_of, core_with_clock, id_of, seed_admin, seed_company,
    seed_employee, seed_supervisor,
};

#[tokio::test]
async fn registration_creates_the_owner_pairing() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;

    assert!(company.company_code.starts_with("CMP-"));
    assert!(company.is_active);

    // The owning user exists, carries the COMPANY role and the back-link
    let owner = state.users().get_by_email("acme@staffcore.test").await?;
    assert_eq!(owner.role, Role::Company);
    assert_eq!(owner.id.as_ref(), Some(&company.user_id));
    assert_eq!(
        owner.company_id.as_ref().map(|id| id.to_string()),
        Some(company_id_of(&company))
    );
    assert_eq!(owner.company_code.as_deref(), Some(company.company_code.as_str()));
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_leaves_no_partial_state() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;

    let err = state
        .companies()
        .register(CompanyRegister {
            name: "Acme Clone".into(),
            email: "acme@staffcore.test".into(),
            password: "another-secret".into(),
            phone: None,
            address: None,
            tax_id: None,
            owner_name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // The failed attempt wrote nothing
    let companies = state.companies().list(true).await?;
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].name, "Acme Staffing");
    Ok(())
}

#[tokio::test]
async fn deactivation_cascades_to_the_owner() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);

    let disabled = state.companies().set_active(&company_id, false).await?;
    assert!(!disabled.is_active);

    let owner = state.users().get_by_email("acme@staffcore.test").await?;
    assert!(!owner.is_active);

    // Default listing hides disabled companies, the admin view keeps them
    assert!(state.companies().list(false).await?.is_empty());
    assert_eq!(state.companies().list(true).await?.len(), 1);

    let enabled = state.companies().set_active(&company_id, true).await?;
    assert!(enabled.is_active);
    Ok(())
}

#[tokio::test]
async fn promotion_requires_a_company_attachment() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let admin = seed_admin(&state).await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let free = seed_employee(&state, "Meena Iyer", "meena@staffcore.test", None).await;
    let attached = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;

    let users = state.users();

    // Unattached employees cannot run a crew
    let err = users.promote_to_supervisor(&id_of(&free)).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");

    state
        .assignments()
        .create(
            assignment_payload(&attached, &company, "2025-06-01", "2025-06-30", 450.0),
            &admin,
        )
        .await?;

    let promoted = users.promote_to_supervisor(&id_of(&attached)).await?;
    assert_eq!(promoted.role, Role::Supervisor);

    let refreshed = state.companies().get(&company_id_of(&company)).await?;
    assert!(refreshed.supervisors.contains(&promoted.id.clone().expect("id")));

    // Promotion is not repeatable
    let err = users
        .promote_to_supervisor(&id_of(&attached))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn deleting_a_supervisor_unlinks_the_company() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let company = seed_company(&state, "Acme Staffing", "acme@staffcore.test").await;
    let company_id = company_id_of(&company);
    let supervisor = seed_supervisor(&state, "super@staffcore.test", &company_id).await;
    let supervisor_id = id_of(&supervisor);
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;

    let users = state.users();

    // Only supervisors go through the hard-delete path
    let err = users.delete_supervisor(&id_of(&employee)).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");

    let linked = state.companies().get(&company_id).await?;
    assert_eq!(linked.supervisors.len(), 1);

    users.delete_supervisor(&supervisor_id).await?;

    let unlinked = state.companies().get(&company_id).await?;
    assert!(unlinked.supervisors.is_empty());
    let err = users.get(&supervisor_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn password_rotation_verifies_the_current_secret() -> anyhow::Result<()> {
    let (state, _clock) = core_with_clock().await;
    let employee = seed_employee(&state, "Ravi Kumar", "ravi@staffcore.test", None).await;
    let employee_id = id_of(&employee);

    let users = state.users();

    let err = users
        .change_password(&employee_id, "wrong-secret", "fresh-secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let err = users
        .change_password(&employee_id, "employee-secret", "tiny")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    users
        .change_password(&employee_id, "employee-secret", "fresh-secret")
        .await?;

    // The new secret is the current one from here on
    users
        .change_password(&employee_id, "fresh-secret", "employee-secret")
        .await?;
    Ok(())
}
