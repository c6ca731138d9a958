//! Database Module
//!
//! Embedded SurrealDB: RocksDB-backed for durable deployments, in-memory
//! for tests. Schema and uniqueness indexes are defined at open time.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Uniqueness invariants live in the store, not just in the services:
/// duplicate emails and duplicate salary periods must fail even if a
/// service-level check is raced past.
const SCHEMA: &[&str] = &[
    "DEFINE TABLE IF NOT EXISTS user SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE",
    "DEFINE TABLE IF NOT EXISTS company SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS assignment SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS attendance SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS attendance_day ON attendance FIELDS employee, date UNIQUE",
    "DEFINE TABLE IF NOT EXISTS salary SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS salary_period ON salary FIELDS employee, company, month, year UNIQUE",
];

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open a RocksDB-backed database under the given directory
    pub async fn open(path: &Path, namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::finish(db, namespace, database).await
    }

    /// Open an in-memory database (tests, ephemeral runs)
    pub async fn open_in_memory(namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
        Self::finish(db, namespace, database).await
    }

    async fn finish(db: Surreal<Db>, namespace: &str, database: &str) -> Result<Self, AppError> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select ns/db: {}", e)))?;

        for statement in SCHEMA {
            db.query(*statement)
                .await
                .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;
        }
        tracing::info!("Database ready (ns={}, db={})", namespace, database);

        Ok(Self { db })
    }

    pub fn handle(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
