//! Jobs command - Background job management.
//!
//! Provides CLI commands to manage background jobs:
//! - `work`: Start the email worker process
//! - `list`: Show pending/failed jobs
//! - `clear`: Remove failed jobs from the queue
//! - `expire-posts`: Move published posts past their deadline to Expired
//!
//! ## Usage
//!
//! ```bash
//! # Start the job worker
//! skillbridge jobs work
//!
//! # Run from cron, e.g. hourly
//! skillbridge jobs expire-posts
//! ```

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::collections::BTreeMap;

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::db::SchemaPolicy;
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::jobs::EmailJob;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
        JobsAction::ExpirePosts => expire_posts(&config).await,
    }
}

/// Open the email queue, creating the apalis tables on first use.
pub(crate) async fn email_storage(config: &Config) -> AppResult<PostgresStorage<EmailJob>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(PostgresStorage::new(pool))
}

/// Start the background job worker
///
/// Connects to the database and starts processing jobs from the queue.
/// Uses apalis with PostgreSQL storage for job persistence.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    use crate::jobs::email_job_handler;

    tracing::info!("Connecting to database for job worker...");
    let storage = email_storage(config).await?;

    tracing::info!("Job worker started. Press Ctrl+C to stop.");

    // Build and run the worker
    let worker = WorkerBuilder::new("email-worker")
        .backend(storage)
        .build_fn(email_job_handler);

    // Run with graceful shutdown on Ctrl+C
    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

/// Connection to the queue database, or `None` while `jobs work` has never
/// created the apalis schema.
async fn queue_connection(config: &Config) -> AppResult<Option<DatabaseConnection>> {
    let db = Database::open(config, SchemaPolicy::AsIs)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?
        .pool();

    let exists = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?
        .and_then(|row| row.try_get::<bool>("", "exists").ok())
        .unwrap_or(false);

    Ok(exists.then_some(db))
}

/// Print email queue counts by status
async fn list_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Email queue not initialized. Run 'skillbridge jobs work' to create it.");
        return Ok(());
    };

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut counts: BTreeMap<String, i64> = ["Pending", "Running", "Failed", "Done"]
        .into_iter()
        .map(|status| (status.to_string(), 0))
        .collect();
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            counts.insert(status, count);
        }
    }

    println!("\n=== Email Queue ===");
    for (status, count) in &counts {
        println!("{:<9} {}", format!("{}:", status), count);
    }
    println!("===================\n");
    Ok(())
}

/// Delete failed email jobs
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Email queue not initialized. Nothing to clear.");
        return Ok(());
    };

    let cleared = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?
        .rows_affected();

    tracing::info!(count = cleared, "Cleared failed email jobs");
    println!("Cleared {} failed job(s) from the queue.", cleared);
    Ok(())
}

/// Expire published posts whose deadline has passed.
async fn expire_posts(config: &Config) -> AppResult<()> {
    let db = Database::open(config, SchemaPolicy::AsIs)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Persistence::new(db.pool());

    let expired = uow.job_posts().expire_past_deadline(Utc::now()).await?;
    tracing::info!(count = expired, "Expired job posts past their deadline");
    println!("Expired {} job post(s).", expired);

    Ok(())
}
