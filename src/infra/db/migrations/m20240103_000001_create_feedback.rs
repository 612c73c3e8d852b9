//! Migration: employer feedback on candidates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedbacks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedbacks::EmployerId).uuid().not_null())
                    .col(ColumnDef::new(Feedbacks::JobSeekerId).uuid().not_null())
                    .col(ColumnDef::new(Feedbacks::JobTitle).string().not_null())
                    .col(ColumnDef::new(Feedbacks::Rating).integer().not_null())
                    .col(ColumnDef::new(Feedbacks::Feedback).text().not_null())
                    .col(ColumnDef::new(Feedbacks::Skills).json_binary().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::WouldRecommend)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Feedbacks::Rating).between(1, 5))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::EmployerId)
                            .to(Employers::Table, Employers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::JobSeekerId)
                            .to(JobSeekers::Table, JobSeekers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_employer")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::EmployerId)
                    .col(Feedbacks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_job_seeker")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::JobSeekerId)
                    .col(Feedbacks::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feedbacks {
    Table,
    Id,
    EmployerId,
    JobSeekerId,
    JobTitle,
    Rating,
    Feedback,
    Skills,
    WouldRecommend,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employers {
    Table,
    Id,
}

#[derive(Iden)]
enum JobSeekers {
    Table,
    Id,
}
