//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tables;
mod m20240102_000001_seed_catalog;
mod m20240103_000001_create_feedback;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_tables::Migration),
            Box::new(m20240102_000001_seed_catalog::Migration),
            Box::new(m20240103_000001_create_feedback::Migration),
        ]
    }
}

/// One-line description shown by `migrate status`.
pub fn summary(name: &str) -> &'static str {
    match name {
        "m20240101_000001_create_tables" => "accounts, profiles, catalog, job posts, applications",
        "m20240102_000001_seed_catalog" => "seed job categories, job types and cities",
        "m20240103_000001_create_feedback" => "employer feedback on candidates",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_migration_has_a_summary() {
        for migration in Migrator::migrations() {
            assert!(!summary(migration.name()).is_empty(), "{}", migration.name());
        }
    }
}
