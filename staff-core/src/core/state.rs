//! Core State
//!
//! [`CoreState`] holds the shared handles (config, database, clock) and
//! hands out the domain services. Services are cheap to construct: they
//! clone the database handle and the clock, nothing else.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::assignments::AssignmentEngine;
use crate::attendance::AttendanceService;
use crate::companies::CompanyService;
use crate::core::Config;
use crate::db::DbService;
use crate::payroll::PayrollService;
use crate::users::UserService;
use crate::utils::{AppResult, SharedClock, SystemClock};

/// Shared core state — configuration, database and clock
#[derive(Clone)]
pub struct CoreState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub clock: SharedClock,
}

impl CoreState {
    /// Open the durable database under the configured work dir and wire
    /// the system clock
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let data_dir = std::path::Path::new(&config.work_dir).join("data");
        let service = DbService::open(&data_dir, &config.db_namespace, &config.db_database).await?;
        tracing::info!(
            "Core initialized (environment={}, work_dir={})",
            config.environment,
            config.work_dir
        );
        Ok(Self {
            db: service.handle(),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// In-memory state for tests and ephemeral runs, with an injectable
    /// clock
    pub async fn in_memory(clock: SharedClock) -> AppResult<Self> {
        let config = Config {
            work_dir: String::new(),
            db_namespace: "staff".into(),
            db_database: "core".into(),
            environment: "test".into(),
        };
        let service = DbService::open_in_memory(&config.db_namespace, &config.db_database).await?;
        Ok(Self {
            db: service.handle(),
            clock,
            config,
        })
    }

    pub fn assignments(&self) -> AssignmentEngine {
        AssignmentEngine::new(self.db.clone(), self.clock.clone())
    }

    pub fn attendance(&self) -> AttendanceService {
        AttendanceService::new(self.db.clone(), self.clock.clone())
    }

    pub fn payroll(&self) -> PayrollService {
        PayrollService::new(self.db.clone(), self.clock.clone())
    }

    pub fn companies(&self) -> CompanyService {
        CompanyService::new(self.db.clone(), self.clock.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.db.clone(), self.clock.clone())
    }
}
