//! Repository Module
//!
//! CRUD and query surface for the five entity tables. Repositories are
//! thin over SurrealDB: string queries with bound parameters, `take(0)`
//! for results, `RecordId` parsed from the `"table:id"` convention.

pub mod assignment;
pub mod attendance;
pub mod company;
pub mod salary;
pub mod user;

pub use assignment::AssignmentRepository;
pub use attendance::AttendanceRepository;
pub use company::CompanyRepository;
pub use salary::SalaryRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        // Unique index violations surface as a Duplicate, everything else
        // as Database
        let msg = err.to_string();
        if msg.contains("already contains") || msg.contains("index `") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a "table:id" string into a RecordId, expecting a specific table
pub fn parse_record_id(id: &str, table: &str) -> RepoResult<RecordId> {
    let thing: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if thing.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected {} id, got: {}",
            table, id
        )));
    }
    Ok(thing)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
