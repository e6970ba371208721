use anyhow::{Context, Result};
use database_layer::DatabasePool;
use logger_redacted::RedactedLogger;
use sqlx::PgPool;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::ClinicConfig;
use crate::services::{AppointmentService, DoctorService, PatientService, PrescriptionService, Repositories};

/// Shared application state handed to every HTTP handler and gRPC service
#[derive(Clone)]
pub struct ClinicServer {
    /// Server configuration
    pub config: ClinicConfig,
    /// Present when backed by PostgreSQL
    pub db_pool: Option<DatabasePool>,
    pub patients: PatientService,
    pub doctors: DoctorService,
    pub appointments: AppointmentService,
    pub prescriptions: PrescriptionService,
    /// Request logger with PII redaction
    pub logger: RedactedLogger,
    started_at: Instant,
}

impl ClinicServer {
    fn assemble(config: ClinicConfig, db_pool: Option<DatabasePool>, repos: &Repositories) -> Self {
        let logger = RedactedLogger::with_config("clinic_server", &config.logging);
        Self {
            patients: PatientService::new(repos),
            doctors: DoctorService::new(repos),
            appointments: AppointmentService::new(repos),
            prescriptions: PrescriptionService::new(repos),
            config,
            db_pool,
            logger,
            started_at: Instant::now(),
        }
    }

    /// Server backed by process-local repositories; data is lost on exit.
    pub fn in_memory(config: ClinicConfig) -> Self {
        warn!("Using in-memory repositories; data will not survive a restart");
        Self::assemble(config, None, &Repositories::in_memory())
    }

    /// Connects to PostgreSQL and, unless disabled, runs the migrations.
    ///
    /// # Errors
    ///
    /// Fails when no database URL is configured, the connection cannot be
    /// established or a migration fails.
    pub async fn new(config: ClinicConfig) -> Result<Self> {
        let url = config
            .database
            .url
            .clone()
            .context("database.url is not set (use CLINIC__DATABASE__URL or --in-memory)")?;

        let pool = DatabasePool::with_settings(&url, &config.database.pool)
            .await
            .context("failed to connect to the database")?;

        if config.database.run_migrations {
            pool.run_migrations().await.context("failed to run database migrations")?;
        }

        let repos = Repositories::postgres(pool.pool());
        info!("Clinic server initialised with PostgreSQL storage");
        Ok(Self::assemble(config, Some(pool), &repos))
    }

    /// Wraps an existing pool without running migrations
    pub fn new_with_pool(config: ClinicConfig, pool: PgPool) -> Self {
        let repos = Repositories::postgres(&pool);
        Self::assemble(config, Some(DatabasePool::from_pool(pool)), &repos)
    }

    /// Builds the state over caller-supplied repositories
    pub fn with_repositories(config: ClinicConfig, repos: &Repositories) -> Self {
        Self::assemble(config, None, repos)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Result of a `SELECT 1` probe, `None` when running without a database
    pub async fn database_healthy(&self) -> Option<bool> {
        match &self.db_pool {
            Some(pool) => Some(pool.is_healthy().await),
            None => None,
        }
    }
}
