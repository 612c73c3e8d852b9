//! Profile service - Job seeker and employer profiles.
//!
//! Completeness is recomputed by the domain on every save; uploads replace
//! the previous file, which is removed best-effort.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    EmployerProfile, EmployerProfileChanges, JobSeekerProfile, JobSeekerProfileChanges,
    ProfessionalCard,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{FileStorage, UnitOfWork, UploadKind, UploadedFile};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn job_seeker(&self, user_id: Uuid) -> AppResult<JobSeekerProfile>;

    async fn update_job_seeker(
        &self,
        user_id: Uuid,
        changes: JobSeekerProfileChanges,
    ) -> AppResult<JobSeekerProfile>;

    async fn upload_profile_picture(
        &self,
        user_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<JobSeekerProfile>;

    async fn upload_resume(&self, user_id: Uuid, file: UploadedFile)
        -> AppResult<JobSeekerProfile>;

    async fn remove_resume(&self, user_id: Uuid) -> AppResult<JobSeekerProfile>;

    async fn employer(&self, user_id: Uuid) -> AppResult<EmployerProfile>;

    async fn update_employer(
        &self,
        user_id: Uuid,
        changes: EmployerProfileChanges,
    ) -> AppResult<EmployerProfile>;

    async fn upload_company_logo(
        &self,
        user_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<EmployerProfile>;

    /// The public professionals directory
    async fn professionals(&self, page: PaginationParams) -> AppResult<Paginated<ProfessionalCard>>;
}

pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn FileStorage>,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn FileStorage>) -> Self {
        Self { uow, storage }
    }

    async fn save_job_seeker(&self, mut profile: JobSeekerProfile) -> AppResult<JobSeekerProfile> {
        profile.touch(Utc::now());
        self.uow.job_seekers().save(profile).await
    }

    async fn save_employer(&self, mut profile: EmployerProfile) -> AppResult<EmployerProfile> {
        profile.touch(Utc::now());
        self.uow.employers().save(profile).await
    }

    async fn discard(&self, url: Option<String>) {
        if let Some(url) = url {
            if let Err(e) = self.storage.remove(&url).await {
                tracing::warn!(url = %url, error = %e, "Failed to remove replaced upload");
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn job_seeker(&self, user_id: Uuid) -> AppResult<JobSeekerProfile> {
        self.uow
            .job_seekers()
            .find_by_user(user_id)
            .await?
            .ok_or_not_found("Job seeker profile")
    }

    async fn update_job_seeker(
        &self,
        user_id: Uuid,
        changes: JobSeekerProfileChanges,
    ) -> AppResult<JobSeekerProfile> {
        let mut profile = self.job_seeker(user_id).await?;
        changes.apply(&mut profile)?;
        let saved = self.save_job_seeker(profile).await?;
        tracing::info!(
            user_id = %user_id,
            completeness = saved.profile_completeness,
            "Job seeker profile updated"
        );
        Ok(saved)
    }

    async fn upload_profile_picture(
        &self,
        user_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<JobSeekerProfile> {
        let mut profile = self.job_seeker(user_id).await?;
        let url = self
            .storage
            .store(UploadKind::ProfilePicture, user_id, file)
            .await?;
        let previous = profile.profile_picture_url.replace(url);
        let saved = self.save_job_seeker(profile).await?;
        self.discard(previous).await;
        Ok(saved)
    }

    async fn upload_resume(
        &self,
        user_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<JobSeekerProfile> {
        let mut profile = self.job_seeker(user_id).await?;
        let url = self.storage.store(UploadKind::Resume, user_id, file).await?;
        let previous = profile.resume_url.replace(url);
        let saved = self.save_job_seeker(profile).await?;
        self.discard(previous).await;
        tracing::info!(user_id = %user_id, "Resume uploaded");
        Ok(saved)
    }

    async fn remove_resume(&self, user_id: Uuid) -> AppResult<JobSeekerProfile> {
        let mut profile = self.job_seeker(user_id).await?;
        let previous = profile.resume_url.take();
        let saved = self.save_job_seeker(profile).await?;
        self.discard(previous).await;
        Ok(saved)
    }

    async fn employer(&self, user_id: Uuid) -> AppResult<EmployerProfile> {
        self.uow
            .employers()
            .find_by_user(user_id)
            .await?
            .ok_or_not_found("Employer profile")
    }

    async fn update_employer(
        &self,
        user_id: Uuid,
        changes: EmployerProfileChanges,
    ) -> AppResult<EmployerProfile> {
        let mut profile = self.employer(user_id).await?;
        changes.apply(&mut profile);
        self.save_employer(profile).await
    }

    async fn upload_company_logo(
        &self,
        user_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<EmployerProfile> {
        let mut profile = self.employer(user_id).await?;
        let url = self
            .storage
            .store(UploadKind::CompanyLogo, user_id, file)
            .await?;
        let previous = profile.logo_url.replace(url);
        let saved = self.save_employer(profile).await?;
        self.discard(previous).await;
        Ok(saved)
    }

    async fn professionals(&self, page: PaginationParams) -> AppResult<Paginated<ProfessionalCard>> {
        let (cards, total) = self
            .uow
            .job_seekers()
            .list_public(page.offset(), page.limit())
            .await?;
        Ok(Paginated::new(cards, page.page, page.limit(), total))
    }
}
