//! Application service - Submission and the application status workflow.
//!
//! The unique (job seeker, job post) index is the authoritative duplicate
//! check and the store's conditional slot claim the authoritative capacity
//! check, so the service only resolves the post and the files. Every status
//! change appends exactly one history entry in the same transaction.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::UPLOAD_URL_PREFIX;
use crate::domain::application::check_notes;
use crate::domain::{
    Application, ApplicationStatus, ApplicationView, CurrentUser, JobSeekerProfile,
    NewApplication, ResumeSource, StatusChange,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStorage, UnitOfWork, UploadKind, UploadedFile};

/// A submission as received from the multipart form.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job_post_id: Uuid,
    /// Attach the resume already on the profile instead of `resume`
    pub use_profile_resume: bool,
    pub resume: Option<UploadedFile>,
    pub cover_letter: Option<UploadedFile>,
    pub notes: Option<String>,
}

/// Status change requested by an employer or admin
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[schema(example = "Shortlisted")]
    pub status: String,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    /// Lets an admin move an application out of a terminal state
    #[serde(default)]
    pub admin_override: bool,
}

#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn submit(&self, actor: &CurrentUser, submission: Submission) -> AppResult<Application>;

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Application>;

    async fn update_status(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        update: StatusUpdate,
    ) -> AppResult<Application>;

    async fn withdraw(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Application>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Newest first
    async fn list_for_seeker(&self, actor: &CurrentUser) -> AppResult<Vec<ApplicationView>>;

    async fn list_for_employer(&self, actor: &CurrentUser) -> AppResult<Vec<ApplicationView>>;
}

pub struct ApplicationDesk<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn FileStorage>,
}

impl<U: UnitOfWork> ApplicationDesk<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn FileStorage>) -> Self {
        Self { uow, storage }
    }

    async fn seeker(&self, actor: &CurrentUser) -> AppResult<JobSeekerProfile> {
        self.uow
            .job_seekers()
            .find_by_user(actor.id)
            .await?
            .ok_or_not_found("Job seeker profile")
    }

    async fn application(&self, id: Uuid) -> AppResult<Application> {
        self.uow
            .applications()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Application")
    }

    /// Whether the actor's company owns the post the application targets.
    async fn owns_post(&self, actor: &CurrentUser, application: &Application) -> AppResult<bool> {
        let Some(company) = self.uow.employers().find_by_user(actor.id).await? else {
            return Ok(false);
        };
        let post = self.uow.job_posts().find_by_id(application.job_post_id).await?;
        Ok(post.map(|p| p.is_owned_by(company.id)).unwrap_or(false))
    }

    async fn submitted_by(&self, actor: &CurrentUser, application: &Application) -> AppResult<bool> {
        let profile = self.uow.job_seekers().find_by_user(actor.id).await?;
        Ok(profile.map(|p| p.id == application.job_seeker_id).unwrap_or(false))
    }

    async fn store(&self, owner: Uuid, file: Option<UploadedFile>) -> AppResult<Option<String>> {
        match file {
            Some(file) => Ok(Some(
                self.storage
                    .store(UploadKind::ApplicationDocument, owner, file)
                    .await?,
            )),
            None => Ok(None),
        }
    }

    /// Remove files that were uploaded for one application only.
    async fn discard(&self, urls: Vec<Option<String>>) {
        let prefix = format!("{}/{}/", UPLOAD_URL_PREFIX, UploadKind::ApplicationDocument.directory());
        for url in urls.into_iter().flatten() {
            if !url.starts_with(&prefix) {
                continue;
            }
            if let Err(e) = self.storage.remove(&url).await {
                tracing::warn!(url = %url, error = %e, "Failed to remove application upload");
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> ApplicationService for ApplicationDesk<U> {
    async fn submit(&self, actor: &CurrentUser, submission: Submission) -> AppResult<Application> {
        check_notes(submission.notes.as_deref())?;
        let profile = self.seeker(actor).await?;

        let post = self
            .uow
            .job_posts()
            .find_by_id(submission.job_post_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_not_found("Job post")?;

        let source = if submission.use_profile_resume {
            ResumeSource::Profile
        } else {
            ResumeSource::Uploaded(self.store(actor.id, submission.resume).await?)
        };
        let uploaded_resume = match &source {
            ResumeSource::Uploaded(url) => url.clone(),
            ResumeSource::Profile => None,
        };
        let resume_url = match source.resolve(profile.resume_url.as_deref()) {
            Ok(url) => url,
            Err(e) => {
                self.discard(vec![uploaded_resume]).await;
                return Err(e);
            }
        };
        let cover_letter_url = match self.store(actor.id, submission.cover_letter).await {
            Ok(url) => url,
            Err(e) => {
                self.discard(vec![uploaded_resume]).await;
                return Err(e);
            }
        };

        let result = self
            .uow
            .applications()
            .submit(NewApplication {
                job_seeker_id: profile.id,
                job_post_id: post.id,
                resume_url,
                cover_letter_url: cover_letter_url.clone(),
                notes: submission.notes,
            })
            .await;

        match result {
            Ok(application) => {
                tracing::info!(
                    application_id = %application.id,
                    job_post_id = %post.id,
                    job_seeker_id = %profile.id,
                    "Application submitted"
                );
                Ok(application)
            }
            Err(e) => {
                self.discard(vec![uploaded_resume, cover_letter_url]).await;
                Err(e)
            }
        }
    }

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Application> {
        let application = self.application(id).await?;
        if actor.is_admin()
            || self.submitted_by(actor, &application).await?
            || self.owns_post(actor, &application).await?
        {
            Ok(application)
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn update_status(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        update: StatusUpdate,
    ) -> AppResult<Application> {
        let next: ApplicationStatus = update.status.parse()?;
        let application = self.application(id).await?;

        if !actor.is_admin() && !self.owns_post(actor, &application).await? {
            return Err(AppError::Forbidden);
        }

        let admin_override = update.admin_override && actor.is_admin();
        application.check_transition(next, admin_override)?;

        let updated = self
            .uow
            .applications()
            .update_status(
                id,
                StatusChange {
                    from: application.status,
                    status: next,
                    updated_by: actor.id,
                    at: Utc::now(),
                    notes: update.notes,
                },
            )
            .await?;

        tracing::info!(
            application_id = %id,
            from = %application.status,
            to = %next,
            actor = %actor.id,
            admin_override,
            "Application status changed"
        );
        Ok(updated)
    }

    async fn withdraw(&self, actor: &CurrentUser, id: Uuid) -> AppResult<Application> {
        let application = self.application(id).await?;
        if !self.submitted_by(actor, &application).await? {
            return Err(AppError::Forbidden);
        }
        application.check_transition(ApplicationStatus::Withdrawn, false)?;

        self.uow
            .applications()
            .update_status(
                id,
                StatusChange {
                    from: application.status,
                    status: ApplicationStatus::Withdrawn,
                    updated_by: actor.id,
                    at: Utc::now(),
                    notes: Some("Withdrawn by applicant".to_string()),
                },
            )
            .await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        let application = self.application(id).await?;
        if !actor.is_admin() && !self.submitted_by(actor, &application).await? {
            return Err(AppError::Forbidden);
        }

        self.uow.applications().delete(id).await?;
        self.discard(vec![Some(application.resume_url), application.cover_letter_url])
            .await;

        tracing::info!(application_id = %id, actor = %actor.id, "Application deleted");
        Ok(())
    }

    async fn list_for_seeker(&self, actor: &CurrentUser) -> AppResult<Vec<ApplicationView>> {
        let profile = self.seeker(actor).await?;
        self.uow.applications().list_for_seeker(profile.id).await
    }

    async fn list_for_employer(&self, actor: &CurrentUser) -> AppResult<Vec<ApplicationView>> {
        let company = self
            .uow
            .employers()
            .find_by_user(actor.id)
            .await?
            .ok_or_not_found("Employer profile")?;
        self.uow.applications().list_for_employer(company.id).await
    }
}
