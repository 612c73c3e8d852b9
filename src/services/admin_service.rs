//! Admin moderation: accounts, job post approval, the dashboard overview and
//! reports.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::APPLICATION_REPORT_LIMIT;
use crate::domain::validation::normalize_email;
use crate::domain::{
    AdminPostFilter, ApplicationReport, ApplicationReportFilter, CurrentUser, JobAnalytics,
    JobAnalyticsFilter, JobPost, JobPostStatus, Password, Role, User, UserResponse, UserStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Mailer, UnitOfWork};
use crate::jobs::EmailComposer;
use crate::types::{Paginated, PaginationParams};

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub job_seekers: u64,
    pub employers: u64,
    pub admins: u64,
    pub pending_job_posts: u64,
    pub published_job_posts: u64,
    pub applications: u64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub status: UserStatus,
    /// Included in the suspension notice
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn overview(&self) -> AppResult<AdminOverview>;

    async fn list_users(
        &self,
        role: Option<Role>,
        page: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;

    async fn update_user_status(
        &self,
        actor: &CurrentUser,
        user_id: Uuid,
        update: UserStatusUpdate,
    ) -> AppResult<User>;

    /// Set a new password, clearing any lock and marking the email verified
    async fn reset_user_password(&self, user_id: Uuid, password: String) -> AppResult<()>;

    async fn approve_job_post(&self, actor: &CurrentUser, id: Uuid) -> AppResult<JobPost>;

    async fn delete_job_post(&self, actor: &CurrentUser, id: Uuid) -> AppResult<JobPost>;

    async fn list_job_posts(
        &self,
        filter: AdminPostFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<JobPost>>;

    /// Any post, including soft-deleted ones
    async fn job_post_detail(&self, id: Uuid) -> AppResult<JobPost>;

    /// Per-post views and application counts, most applied first
    async fn job_analytics(&self, filter: JobAnalyticsFilter) -> AppResult<JobAnalytics>;

    /// Newest matching applications with stats over every match
    async fn application_report(&self, filter: ApplicationReportFilter)
        -> AppResult<ApplicationReport>;

    /// Change another admin's sign-in email. Non-admin targets are not found.
    async fn update_admin_email(&self, actor: &CurrentUser, admin_id: Uuid, email: String)
        -> AppResult<User>;

    async fn update_admin_password(
        &self,
        actor: &CurrentUser,
        admin_id: Uuid,
        password: String,
    ) -> AppResult<()>;
}

pub struct Moderator<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    emails: EmailComposer,
}

impl<U: UnitOfWork> Moderator<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, emails: EmailComposer) -> Self {
        Self {
            uow,
            mailer,
            emails,
        }
    }

    async fn job_post(&self, id: Uuid) -> AppResult<JobPost> {
        self.uow
            .job_posts()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Job post")
    }

    async fn admin(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .filter(|user| user.role == Role::Admin)
            .ok_or_not_found("Admin")
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for Moderator<U> {
    async fn overview(&self) -> AppResult<AdminOverview> {
        let users = self.uow.users();
        let posts = self.uow.job_posts();
        let submitted = self.uow.applications();

        let (job_seekers, employers, admins, pending_job_posts, published_job_posts, applications) =
            futures::try_join!(
                users.count_by_role(Role::JobSeeker),
                users.count_by_role(Role::Employer),
                users.count_by_role(Role::Admin),
                posts.count_pending(),
                posts.count_by_status(JobPostStatus::Published),
                submitted.count(),
            )?;

        Ok(AdminOverview {
            job_seekers,
            employers,
            admins,
            pending_job_posts,
            published_job_posts,
            applications,
        })
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        page: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        let (users, total) = self
            .uow
            .users()
            .list(role, page.offset(), page.limit())
            .await?;
        let users = users.into_iter().map(UserResponse::from).collect();
        Ok(Paginated::new(users, page.page, page.limit(), total))
    }

    async fn update_user_status(
        &self,
        actor: &CurrentUser,
        user_id: Uuid,
        update: UserStatusUpdate,
    ) -> AppResult<User> {
        if actor.id == user_id && update.status == UserStatus::Inactive {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let user = self.uow.users().set_status(user_id, update.status).await?;
        tracing::info!(
            user_id = %user_id,
            status = %update.status,
            admin = %actor.id,
            "User status changed"
        );

        if update.status == UserStatus::Suspended {
            let reason = update
                .reason
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or("Violation of the terms of service");
            let notice = self.emails.suspension(&user.email, &user.full_name(), reason);
            if let Err(e) = self.mailer.send(notice).await {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to send suspension notice");
            }
        }

        Ok(user)
    }

    async fn reset_user_password(&self, user_id: Uuid, password: String) -> AppResult<()> {
        let password = Password::new(&password)?;
        let users = self.uow.users();
        users.find_by_id(user_id).await?.ok_or_not_found("User")?;
        users
            .set_password(user_id, password.into_string(), true)
            .await?;

        tracing::info!(user_id = %user_id, "Password reset by admin");
        Ok(())
    }

    async fn approve_job_post(&self, actor: &CurrentUser, id: Uuid) -> AppResult<JobPost> {
        self.job_post(id).await?.check_approvable()?;

        let approved = self
            .uow
            .job_posts()
            .approve(id, actor.id, Utc::now())
            .await?
            .ok_or(AppError::AlreadyApproved)?;

        tracing::info!(job_post_id = %id, admin = %actor.id, "Job post approved");
        Ok(approved)
    }

    async fn delete_job_post(&self, actor: &CurrentUser, id: Uuid) -> AppResult<JobPost> {
        self.job_post(id).await?;
        let deleted = self.uow.job_posts().soft_delete(id).await?;
        tracing::info!(job_post_id = %id, admin = %actor.id, "Job post deleted by admin");
        Ok(deleted)
    }

    async fn list_job_posts(
        &self,
        filter: AdminPostFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<JobPost>> {
        let (posts, total) = self
            .uow
            .job_posts()
            .list_admin(filter, page.offset(), page.limit())
            .await?;
        Ok(Paginated::new(posts, page.page, page.limit(), total))
    }

    async fn job_post_detail(&self, id: Uuid) -> AppResult<JobPost> {
        self.job_post(id).await
    }

    async fn job_analytics(&self, filter: JobAnalyticsFilter) -> AppResult<JobAnalytics> {
        let metrics = self.uow.reports().job_metrics(filter).await?;
        Ok(JobAnalytics::new(metrics))
    }

    async fn application_report(
        &self,
        filter: ApplicationReportFilter,
    ) -> AppResult<ApplicationReport> {
        self.uow
            .reports()
            .application_report(filter, APPLICATION_REPORT_LIMIT)
            .await
    }

    async fn update_admin_email(
        &self,
        actor: &CurrentUser,
        admin_id: Uuid,
        email: String,
    ) -> AppResult<User> {
        let email = normalize_email(&email);
        let current = self.admin(admin_id).await?;
        if current.email == email {
            return Ok(current);
        }

        let updated = self.uow.users().set_email(admin_id, email).await?;
        tracing::info!(admin_id = %admin_id, by = %actor.id, "Admin email changed");
        Ok(updated)
    }

    async fn update_admin_password(
        &self,
        actor: &CurrentUser,
        admin_id: Uuid,
        password: String,
    ) -> AppResult<()> {
        let password = Password::new(&password)?;
        self.admin(admin_id).await?;
        self.uow
            .users()
            .set_password(admin_id, password.into_string(), false)
            .await?;
        tracing::info!(admin_id = %admin_id, by = %actor.id, "Admin password changed");
        Ok(())
    }
}
