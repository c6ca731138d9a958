//! Shared fixtures for the integration tests: in-memory database, pinned
//! clock, and seed records.
#![allow(dead_code)]

use std::sync::Arc;

use staff_core::{
    AssignmentCreate, Company, CompanyRegister, CoreState, FixedClock, Role, SalaryStructure,
    SharedClock, User, UserCreate,
};

/// 2025-06-02T12:00:00Z
pub const BASE_NOW: i64 = 1_748_865_600_000;

pub async fn core_with_clock() -> (CoreState, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::at(BASE_NOW));
    let state = CoreState::in_memory(clock.clone() as SharedClock)
        .await
        .expect("in-memory core");
    (state, clock)
}

pub fn id_of(user: &User) -> String {
    user.id.as_ref().expect("user id").to_string()
}

pub fn company_id_of(company: &Company) -> String {
    company.id.as_ref().expect("company id").to_string()
}

pub async fn seed_admin(state: &CoreState) -> String {
    let admin = state
        .users()
        .create(UserCreate {
            name: "Platform Admin".into(),
            email: "admin@staffcore.test".into(),
            password: "admin-secret".into(),
            role: Role::Admin,
            phone: None,
            address: None,
            company_id: None,
            government_id: None,
            bank_details: None,
            salary_structure: None,
        })
        .await
        .expect("seed admin");
    id_of(&admin)
}

pub async fn seed_company(state: &CoreState, name: &str, email: &str) -> Company {
    state
        .companies()
        .register(CompanyRegister {
            name: name.into(),
            email: email.into(),
            password: "company-secret".into(),
            phone: None,
            address: None,
            tax_id: Some("29ABCDE1234F1Z5".into()),
            owner_name: None,
        })
        .await
        .expect("seed company")
}

pub async fn seed_employee(
    state: &CoreState,
    name: &str,
    email: &str,
    salary_structure: Option<SalaryStructure>,
) -> User {
    state
        .users()
        .create(UserCreate {
            name: name.into(),
            email: email.into(),
            password: "employee-secret".into(),
            role: Role::Employee,
            phone: None,
            address: None,
            company_id: None,
            government_id: Some("GOV-1234".into()),
            bank_details: None,
            salary_structure,
        })
        .await
        .expect("seed employee")
}

pub async fn seed_supervisor(state: &CoreState, email: &str, company_id: &str) -> User {
    state
        .users()
        .create(UserCreate {
            name: "Shift Supervisor".into(),
            email: email.into(),
            password: "supervisor-secret".into(),
            role: Role::Supervisor,
            phone: None,
            address: None,
            company_id: Some(company_id.to_string()),
            government_id: None,
            bank_details: None,
            salary_structure: None,
        })
        .await
        .expect("seed supervisor")
}

pub fn assignment_payload(
    employee: &User,
    company: &Company,
    start_date: &str,
    end_date: &str,
    daily_salary: f64,
) -> AssignmentCreate {
    AssignmentCreate {
        employee_id: id_of(employee),
        company_id: company_id_of(company),
        start_date: start_date.into(),
        end_date: end_date.into(),
        daily_salary,
        notes: None,
    }
}

/// The reference fixed monthly structure used across payroll tests
pub fn reference_structure() -> SalaryStructure {
    SalaryStructure {
        basic_salary: 20000.0,
        hra: 5000.0,
        allowances: 2000.0,
        pf_applicable: true,
        pf_amount: 0.0,
        esi_applicable: false,
        esi_amount: 0.0,
    }
}
