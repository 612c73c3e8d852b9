//! Job post service - Employer side of the job post lifecycle and the
//! public board.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    CurrentUser, EmployerProfile, JobPost, JobPostChanges, JobPostFilter, JobPostStatus,
    NewJobPost,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait JobPostService: Send + Sync {
    /// New posts start as unapproved drafts owned by the caller's company
    async fn create(&self, actor: &CurrentUser, post: NewJobPost) -> AppResult<JobPost>;

    /// Post detail. Anyone sees a publicly visible post and counts a view;
    /// drafts, paused and expired posts are shown only to the owning
    /// employer and admins, without counting.
    async fn get(&self, viewer: Option<&CurrentUser>, id: Uuid) -> AppResult<JobPost>;

    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        changes: JobPostChanges,
    ) -> AppResult<JobPost>;

    /// Owner-initiated pause, resume or close
    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        target: JobPostStatus,
    ) -> AppResult<JobPost>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    async fn list_public(
        &self,
        filter: JobPostFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<JobPost>>;

    async fn list_for_employer(&self, actor: &CurrentUser) -> AppResult<Vec<JobPost>>;
}

pub struct JobBoard<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> JobBoard<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn company(&self, actor: &CurrentUser) -> AppResult<EmployerProfile> {
        self.uow
            .employers()
            .find_by_user(actor.id)
            .await?
            .ok_or_not_found("Employer profile")
    }

    /// Whether the viewer may see the post while it is off the board.
    async fn may_preview(&self, viewer: Option<&CurrentUser>, post: &JobPost) -> AppResult<bool> {
        let Some(viewer) = viewer else {
            return Ok(false);
        };
        if viewer.is_admin() {
            return Ok(true);
        }
        let company = self.uow.employers().find_by_user(viewer.id).await?;
        Ok(company.map(|c| post.is_owned_by(c.id)).unwrap_or(false))
    }

    /// Load a post the caller's company owns.
    async fn owned(&self, actor: &CurrentUser, id: Uuid) -> AppResult<JobPost> {
        let company = self.company(actor).await?;
        let post = self
            .uow
            .job_posts()
            .find_by_id(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_not_found("Job post")?;

        if !post.is_owned_by(company.id) {
            return Err(AppError::Forbidden);
        }
        Ok(post)
    }
}

#[async_trait]
impl<U: UnitOfWork> JobPostService for JobBoard<U> {
    async fn create(&self, actor: &CurrentUser, post: NewJobPost) -> AppResult<JobPost> {
        post.check(Utc::now())?;
        let company = self.company(actor).await?;
        let created = self.uow.job_posts().create(company.id, post).await?;

        tracing::info!(
            job_post_id = %created.id,
            employer_id = %company.id,
            "Job post created"
        );
        Ok(created)
    }

    async fn get(&self, viewer: Option<&CurrentUser>, id: Uuid) -> AppResult<JobPost> {
        let post = self
            .uow
            .job_posts()
            .find_by_id(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_not_found("Job post")?;

        if post.is_publicly_visible(Utc::now()) {
            return Ok(self.uow.job_posts().record_view(id).await?.unwrap_or(post));
        }
        if self.may_preview(viewer, &post).await? {
            return Ok(post);
        }
        Err(AppError::not_found("Job post"))
    }

    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        changes: JobPostChanges,
    ) -> AppResult<JobPost> {
        let mut post = self.owned(actor, id).await?;
        post.check_editable()?;
        changes.apply(&mut post, Utc::now())?;
        self.uow.job_posts().update_content(post).await
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        target: JobPostStatus,
    ) -> AppResult<JobPost> {
        let post = self.owned(actor, id).await?;
        post.check_employer_transition(target)?;
        let updated = self
            .uow
            .job_posts()
            .set_status(id, post.status, target)
            .await?;

        tracing::info!(
            job_post_id = %id,
            from = %post.status,
            to = %target,
            "Job post status changed"
        );
        Ok(updated)
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.owned(actor, id).await?;
        self.uow.job_posts().soft_delete(id).await?;
        tracing::info!(job_post_id = %id, "Job post deleted by owner");
        Ok(())
    }

    async fn list_public(
        &self,
        filter: JobPostFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<JobPost>> {
        let (posts, total) = self
            .uow
            .job_posts()
            .list_public(filter, Utc::now(), page.offset(), page.limit())
            .await?;
        Ok(Paginated::new(posts, page.page, page.limit(), total))
    }

    async fn list_for_employer(&self, actor: &CurrentUser) -> AppResult<Vec<JobPost>> {
        let company = self.company(actor).await?;
        self.uow.job_posts().list_by_employer(company.id).await
    }
}
