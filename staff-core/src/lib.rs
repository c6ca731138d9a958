//! Staff Core - multi-tenant workforce administration engine
//!
//! # Architecture overview
//!
//! The crate is the callable core of a staffing platform: admins onboard
//! companies, companies onboard employees and supervisors, supervisors
//! record daily attendance, and payroll is generated from attendance
//! plus a pay rate. Transport layers (HTTP, CLI, schedulers) are
//! external callers of the services exposed here.
//!
//! # Module structure
//!
//! ```text
//! staff-core/src/
//! ├── core/          # Config, CoreState (service wiring)
//! ├── db/            # Embedded SurrealDB, models, repositories
//! ├── assignments/   # Assignment lifecycle + non-overlap invariant
//! ├── attendance/    # Daily marks gated by active assignments
//! ├── payroll/       # Payslip generation (fixed structure / daily rate)
//! ├── companies/     # Registration saga, activation cascade
//! ├── users/         # Role-tagged user lifecycle
//! └── utils/         # Errors, clock, time helpers, logging
//! ```

pub mod assignments;
pub mod attendance;
pub mod companies;
pub mod core;
pub mod db;
pub mod payroll;
pub mod users;
pub mod utils;

// Re-export public surface
pub use assignments::{AssignmentEngine, AssignmentQuery};
pub use attendance::AttendanceService;
pub use companies::CompanyService;
pub use core::{Config, CoreState};
pub use db::DbService;
pub use payroll::{GenerationResult, PayrollService, SalaryQuery};
pub use users::UserService;
pub use utils::{AppError, AppResult, Clock, FixedClock, SharedClock, SystemClock};

// Re-export the model types callers exchange with the services
pub use db::models::{
    ActiveEmployee, Assignment, AssignmentCreate, AssignmentDetail, AssignmentStatus,
    AssignmentUpdate, Attendance, AttendanceMark, AttendanceStatus, AttendanceTotals, BulkOutcome,
    BulkReport, Company, CompanyRegister, CompanySummary, CompanyUpdate, MarkResult, Role, Salary,
    SalaryBreakdown, SalaryStatus, SalaryStructure, User, UserCreate, UserSummary, UserUpdate,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
