//! Migration: accounts, profiles, catalog, job posts and applications.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null().default("active"))
                    .col(
                        ColumnDef::new(Users::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::EmailVerificationToken).string().null())
                    .col(
                        ColumnDef::new(Users::EmailVerificationExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::PasswordResetToken).string().null())
                    .col(
                        ColumnDef::new(Users::PasswordResetExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::LoginAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LockUntil).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobCategories::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(JobCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JobCategories::Description).text().null())
                    .col(
                        ColumnDef::new(JobCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(JobCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobTypes::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(JobTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(JobTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .col(ColumnDef::new(Cities::Country).string().not_null())
                    .col(
                        ColumnDef::new(Cities::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobSeekers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobSeekers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobSeekers::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(JobSeekers::StatementHeader).string().null())
                    .col(ColumnDef::new(JobSeekers::Statement).text().null())
                    .col(ColumnDef::new(JobSeekers::University).string().null())
                    .col(ColumnDef::new(JobSeekers::FieldOfStudy).string().null())
                    .col(ColumnDef::new(JobSeekers::ResumeUrl).string().null())
                    .col(ColumnDef::new(JobSeekers::ProfilePictureUrl).string().null())
                    .col(ColumnDef::new(JobSeekers::CityId).uuid().null())
                    .col(ColumnDef::new(JobSeekers::Availability).string().not_null())
                    .col(ColumnDef::new(JobSeekers::ProfileVisibility).string().not_null())
                    .col(ColumnDef::new(JobSeekers::Skills).json_binary().not_null())
                    .col(ColumnDef::new(JobSeekers::Educations).json_binary().not_null())
                    .col(ColumnDef::new(JobSeekers::Experiences).json_binary().not_null())
                    .col(ColumnDef::new(JobSeekers::Projects).json_binary().not_null())
                    .col(ColumnDef::new(JobSeekers::SocialLinks).json_binary().not_null())
                    .col(
                        ColumnDef::new(JobSeekers::ProfileCompleteness)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JobSeekers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobSeekers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_seekers_user")
                            .from(JobSeekers::Table, JobSeekers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_seekers_city")
                            .from(JobSeekers::Table, JobSeekers::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employers::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Employers::CompanyName).string().not_null())
                    .col(ColumnDef::new(Employers::BusinessEmail).string().not_null())
                    .col(ColumnDef::new(Employers::ContactPersonName).string().not_null())
                    .col(ColumnDef::new(Employers::Website).string().null())
                    .col(ColumnDef::new(Employers::Description).text().null())
                    .col(ColumnDef::new(Employers::LogoUrl).string().null())
                    .col(ColumnDef::new(Employers::Industry).string().null())
                    .col(ColumnDef::new(Employers::CompanySize).string().null())
                    .col(ColumnDef::new(Employers::FoundedYear).integer().null())
                    .col(ColumnDef::new(Employers::Headquarters).string().null())
                    .col(ColumnDef::new(Employers::Phone).string().null())
                    .col(ColumnDef::new(Employers::Address).string().null())
                    .col(ColumnDef::new(Employers::CityId).uuid().null())
                    .col(ColumnDef::new(Employers::SocialLinks).json_binary().not_null())
                    .col(
                        ColumnDef::new(Employers::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employers::ProfileCompleteness)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Employers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employers_user")
                            .from(Employers::Table, Employers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employers_city")
                            .from(Employers::Table, Employers::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobPosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobPosts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JobPosts::EmployerId).uuid().not_null())
                    .col(ColumnDef::new(JobPosts::Title).string().not_null())
                    .col(ColumnDef::new(JobPosts::Description).text().not_null())
                    .col(ColumnDef::new(JobPosts::Responsibilities).json_binary().not_null())
                    .col(ColumnDef::new(JobPosts::Requirements).json_binary().not_null())
                    .col(ColumnDef::new(JobPosts::PreferredSkills).json_binary().not_null())
                    .col(ColumnDef::new(JobPosts::ExperienceLevel).string().not_null())
                    .col(ColumnDef::new(JobPosts::ExperienceMinYears).integer().null())
                    .col(ColumnDef::new(JobPosts::ExperienceMaxYears).integer().null())
                    .col(ColumnDef::new(JobPosts::CategoryId).uuid().null())
                    .col(ColumnDef::new(JobPosts::JobTypeId).uuid().null())
                    .col(ColumnDef::new(JobPosts::CityId).uuid().null())
                    .col(ColumnDef::new(JobPosts::SalaryMin).integer().null())
                    .col(ColumnDef::new(JobPosts::SalaryMax).integer().null())
                    .col(
                        ColumnDef::new(JobPosts::SalaryCurrency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(JobPosts::SalaryNegotiable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(JobPosts::Benefits).json_binary().not_null())
                    .col(ColumnDef::new(JobPosts::WorkArrangement).string().not_null())
                    .col(
                        ColumnDef::new(JobPosts::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobPosts::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(JobPosts::MaxApplications)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(JobPosts::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JobPosts::ApplicationCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JobPosts::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(JobPosts::Status).string().not_null())
                    .col(
                        ColumnDef::new(JobPosts::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(JobPosts::ApprovedBy).uuid().null())
                    .col(
                        ColumnDef::new(JobPosts::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JobPosts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(JobPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobPosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posts_employer")
                            .from(JobPosts::Table, JobPosts::EmployerId)
                            .to(Employers::Table, Employers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posts_category")
                            .from(JobPosts::Table, JobPosts::CategoryId)
                            .to(JobCategories::Table, JobCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posts_job_type")
                            .from(JobPosts::Table, JobPosts::JobTypeId)
                            .to(JobTypes::Table, JobTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_posts_city")
                            .from(JobPosts::Table, JobPosts::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Public board: status + approval + deadline
        manager
            .create_index(
                Index::create()
                    .name("idx_job_posts_board")
                    .table(JobPosts::Table)
                    .col(JobPosts::Status)
                    .col(JobPosts::IsApproved)
                    .col(JobPosts::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_posts_employer")
                    .table(JobPosts::Table)
                    .col(JobPosts::EmployerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Applications::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Applications::JobSeekerId).uuid().not_null())
                    .col(ColumnDef::new(Applications::JobPostId).uuid().not_null())
                    .col(ColumnDef::new(Applications::ResumeUrl).string().not_null())
                    .col(ColumnDef::new(Applications::CoverLetterUrl).string().null())
                    .col(ColumnDef::new(Applications::Notes).text().null())
                    .col(ColumnDef::new(Applications::Status).string().not_null())
                    .col(ColumnDef::new(Applications::EmployerNotes).text().null())
                    .col(
                        ColumnDef::new(Applications::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_job_seeker")
                            .from(Applications::Table, Applications::JobSeekerId)
                            .to(JobSeekers::Table, JobSeekers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_job_post")
                            .from(Applications::Table, Applications::JobPostId)
                            .to(JobPosts::Table, JobPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per seeker and post
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_seeker_post")
                    .table(Applications::Table)
                    .col(Applications::JobSeekerId)
                    .col(Applications::JobPostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job_post")
                    .table(Applications::Table)
                    .col(Applications::JobPostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ApplicationStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::ApplicationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::UpdatedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApplicationStatusHistory::Notes).text().null())
                    .col(
                        ColumnDef::new(ApplicationStatusHistory::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_status_history_application")
                            .from(
                                ApplicationStatusHistory::Table,
                                ApplicationStatusHistory::ApplicationId,
                            )
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_application_status_history_application")
                    .table(ApplicationStatusHistory::Table)
                    .col(ApplicationStatusHistory::ApplicationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        manager
            .drop_table(Table::drop().table(ApplicationStatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobSeekers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    Role,
    Status,
    EmailVerified,
    EmailVerificationToken,
    EmailVerificationExpires,
    PasswordResetToken,
    PasswordResetExpires,
    LoginAttempts,
    LockUntil,
    LastLogin,
    CreatedAt,
    UpdatedAt,
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

#[derive(Iden)]
enum JobSeekers {
    Table,
    Id,
    UserId,
    StatementHeader,
    Statement,
    University,
    FieldOfStudy,
    ResumeUrl,
    ProfilePictureUrl,
    CityId,
    Availability,
    ProfileVisibility,
    Skills,
    Educations,
    Experiences,
    Projects,
    SocialLinks,
    ProfileCompleteness,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employers {
    Table,
    Id,
    UserId,
    CompanyName,
    BusinessEmail,
    ContactPersonName,
    Website,
    Description,
    LogoUrl,
    Industry,
    CompanySize,
    FoundedYear,
    Headquarters,
    Phone,
    Address,
    CityId,
    SocialLinks,
    Verified,
    ProfileCompleteness,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum JobPosts {
    Table,
    Id,
    EmployerId,
    Title,
    Description,
    Responsibilities,
    Requirements,
    PreferredSkills,
    ExperienceLevel,
    ExperienceMinYears,
    ExperienceMaxYears,
    CategoryId,
    JobTypeId,
    CityId,
    SalaryMin,
    SalaryMax,
    SalaryCurrency,
    SalaryNegotiable,
    Benefits,
    WorkArrangement,
    Deadline,
    Tags,
    MaxApplications,
    ViewCount,
    ApplicationCount,
    Featured,
    Status,
    IsApproved,
    ApprovedBy,
    ApprovedAt,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Applications {
    Table,
    Id,
    JobSeekerId,
    JobPostId,
    ResumeUrl,
    CoverLetterUrl,
    Notes,
    Status,
    EmployerNotes,
    AppliedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ApplicationStatusHistory {
    Table,
    Id,
    ApplicationId,
    Status,
    UpdatedBy,
    UpdatedAt,
    Notes,
    Seq,
}
