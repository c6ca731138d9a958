//! Entity Models
//!
//! Five tables: `user`, `company`, `assignment`, `attendance`, `salary`.
//! Each model ships with its Create/Update payload structs; record ids
//! serialize as `"table:id"` strings via [`serde_helpers`].

pub mod serde_helpers;

pub mod assignment;
pub mod attendance;
pub mod company;
pub mod salary;
pub mod user;

pub use assignment::{
    ActiveEmployee, Assignment, AssignmentCreate, AssignmentDetail, AssignmentId,
    AssignmentStatus, AssignmentUpdate, intervals_overlap,
};
pub use attendance::{
    Attendance, AttendanceId, AttendanceMark, AttendanceStatus, AttendanceTotals, MarkResult,
};
pub use company::{Company, CompanyId, CompanyRegister, CompanySummary, CompanyUpdate};
pub use salary::{
    BulkEntry, BulkOutcome, BulkReport, Salary, SalaryBreakdown, SalaryId, SalaryStatus,
};
pub use user::{
    BankDetails, DocumentRef, Role, SalaryStructure, User, UserCreate, UserId, UserSummary,
    UserUpdate,
};
