//! Postgres pool and schema management.
//!
//! `serve` opens the pool with `SchemaPolicy::Migrate`; the CLI commands open
//! it as-is and drive migrations themselves.

use sea_orm::{
    ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Statement,
};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::config::Config;
use crate::infra::repositories::entities::{city, job_category, job_type};

pub mod migrations;

pub use migrations::Migrator;

/// What opening the pool does to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Apply pending migrations before handing out the pool
    Migrate,
    /// Leave the schema alone
    AsIs,
}

/// One SkillBridge migration and whether it has run.
#[derive(Debug, Clone)]
pub struct MigrationState {
    pub name: String,
    pub summary: &'static str,
    pub applied: bool,
}

/// Catalog rows present after a rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSize {
    pub categories: u64,
    pub job_types: u64,
    pub cities: u64,
}

#[derive(Clone)]
pub struct Database {
    pool: DatabaseConnection,
}

impl Database {
    pub async fn open(config: &Config, policy: SchemaPolicy) -> Result<Self, DbErr> {
        let pool = SeaDatabase::connect(&config.database_url).await?;
        let db = Self { pool };

        if policy == SchemaPolicy::Migrate {
            let applied = db.apply_pending().await.inspect_err(|e| {
                tracing::error!(error = %e, "Schema migration failed");
            })?;
            tracing::info!(applied, "Database ready");
        }
        Ok(db)
    }

    /// Handle for the repositories and the job queue.
    pub fn pool(&self) -> DatabaseConnection {
        self.pool.clone()
    }

    /// Every migration in order, with its applied flag.
    pub async fn migration_report(&self) -> Result<Vec<MigrationState>, DbErr> {
        Ok(Migrator::get_migration_with_status(&self.pool)
            .await?
            .into_iter()
            .map(|m| MigrationState {
                name: m.name().to_string(),
                summary: migrations::summary(m.name()),
                applied: m.status() == MigrationStatus::Applied,
            })
            .collect())
    }

    /// Run whatever has not run yet. Returns how many migrations were applied.
    pub async fn apply_pending(&self) -> Result<usize, DbErr> {
        let pending = Migrator::get_pending_migrations(&self.pool).await?.len();
        if pending > 0 {
            Migrator::up(&self.pool, None).await?;
        }
        Ok(pending)
    }

    /// Undo the newest applied migration and return its name.
    pub async fn revert_last(&self) -> Result<Option<String>, DbErr> {
        let last = Migrator::get_applied_migrations(&self.pool)
            .await?
            .last()
            .map(|m| m.name().to_string());
        if last.is_some() {
            Migrator::down(&self.pool, Some(1)).await?;
        }
        Ok(last)
    }

    /// Drop every table and run all migrations again, seeding the catalog.
    pub async fn rebuild(&self) -> Result<CatalogSize, DbErr> {
        Migrator::fresh(&self.pool).await?;
        Ok(CatalogSize {
            categories: job_category::Entity::find().count(&self.pool).await?,
            job_types: job_type::Entity::find().count(&self.pool).await?,
            cities: city::Entity::find().count(&self.pool).await?,
        })
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.pool
            .execute(Statement::from_string(
                self.pool.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
