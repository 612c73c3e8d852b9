//! Migration: seed job categories, job types and cities.

use chrono::Utc;
use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CATEGORIES: [(&str, &str); 8] = [
    ("Software Development", "Jobs related to web, mobile, and software engineering"),
    ("Design & UI/UX", "Graphic, UI, and product design roles"),
    ("Marketing & Sales", "Marketing, digital campaigns, SEO, and sales"),
    ("Data & AI", "Roles in data science, ML, and analytics"),
    ("Content & Writing", "Copywriting, technical writing, and blogs"),
    ("Business & Management", "Project management, product ownership, business analysis"),
    ("Finance & Accounting", "Jobs in finance, accounting, and bookkeeping"),
    ("Human Resources", "Recruitment, HRM, and employee engagement"),
];

const JOB_TYPES: [&str; 7] = [
    "Full-Time",
    "Part-Time",
    "Internship",
    "Freelance",
    "Contract",
    "Remote",
    "On-site Project",
];

const CITIES: [&str; 25] = [
    "Colombo", "Gampaha", "Kalutara", "Kandy", "Matale", "Nuwara Eliya", "Galle", "Matara",
    "Hambantota", "Jaffna", "Kilinochchi", "Mannar", "Vavuniya", "Mullaitivu", "Batticaloa",
    "Ampara", "Trincomalee", "Kurunegala", "Puttalam", "Anuradhapura", "Polonnaruwa",
    "Badulla", "Monaragala", "Ratnapura", "Kegalle",
];

const COUNTRY: &str = "Sri Lanka";

fn build_err(err: sea_orm_migration::sea_orm::sea_query::error::Error) -> DbErr {
    DbErr::Migration(err.to_string())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        let mut categories = Query::insert();
        categories.into_table(JobCategories::Table).columns([
            JobCategories::Id,
            JobCategories::Name,
            JobCategories::Description,
            JobCategories::IsActive,
            JobCategories::CreatedAt,
        ]);
        for (name, description) in CATEGORIES {
            categories
                .values([
                    Uuid::new_v4().into(),
                    name.into(),
                    description.into(),
                    true.into(),
                    now.into(),
                ])
                .map_err(build_err)?;
        }
        manager.exec_stmt(categories).await?;

        let mut job_types = Query::insert();
        job_types.into_table(JobTypes::Table).columns([
            JobTypes::Id,
            JobTypes::Name,
            JobTypes::IsActive,
            JobTypes::CreatedAt,
        ]);
        for name in JOB_TYPES {
            job_types
                .values([Uuid::new_v4().into(), name.into(), true.into(), now.into()])
                .map_err(build_err)?;
        }
        manager.exec_stmt(job_types).await?;

        let mut cities = Query::insert();
        cities.into_table(Cities::Table).columns([
            Cities::Id,
            Cities::Name,
            Cities::Country,
            Cities::IsActive,
        ]);
        for name in CITIES {
            cities
                .values([Uuid::new_v4().into(), name.into(), COUNTRY.into(), true.into()])
                .map_err(build_err)?;
        }
        manager.exec_stmt(cities).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Cities::Table)
                    .and_where(Expr::col(Cities::Country).eq(COUNTRY))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(JobTypes::Table)
                    .and_where(Expr::col(JobTypes::Name).is_in(JOB_TYPES))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(JobCategories::Table)
                    .and_where(
                        Expr::col(JobCategories::Name).is_in(CATEGORIES.map(|(name, _)| name)),
                    )
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum JobCategories {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum JobTypes {
    Table,
    Id,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    Name,
    Country,
    IsActive,
}
