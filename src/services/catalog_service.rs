//! Lookup data: job categories, job types and cities.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{City, JobCategory, JobType, NewCategory, NewJobType};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn categories(&self) -> AppResult<Vec<JobCategory>>;

    async fn job_types(&self) -> AppResult<Vec<JobType>>;

    async fn cities(&self) -> AppResult<Vec<City>>;

    async fn create_category(&self, category: NewCategory) -> AppResult<JobCategory>;

    async fn create_job_type(&self, job_type: NewJobType) -> AppResult<JobType>;

    async fn category(&self, id: Uuid) -> AppResult<JobCategory>;

    async fn update_category(&self, id: Uuid, category: NewCategory) -> AppResult<JobCategory>;

    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn categories(&self) -> AppResult<Vec<JobCategory>> {
        self.uow.catalog().categories().await
    }

    async fn job_types(&self) -> AppResult<Vec<JobType>> {
        self.uow.catalog().job_types().await
    }

    async fn cities(&self) -> AppResult<Vec<City>> {
        self.uow.catalog().cities().await
    }

    async fn create_category(&self, category: NewCategory) -> AppResult<JobCategory> {
        let category = NewCategory {
            name: category.name.trim().to_string(),
            ..category
        };
        let created = self.uow.catalog().create_category(category).await?;
        tracing::info!(category_id = %created.id, name = %created.name, "Job category created");
        Ok(created)
    }

    async fn create_job_type(&self, job_type: NewJobType) -> AppResult<JobType> {
        let created = self
            .uow
            .catalog()
            .create_job_type(NewJobType {
                name: job_type.name.trim().to_string(),
            })
            .await?;
        tracing::info!(job_type_id = %created.id, name = %created.name, "Job type created");
        Ok(created)
    }

    async fn category(&self, id: Uuid) -> AppResult<JobCategory> {
        self.uow
            .catalog()
            .find_category(id)
            .await?
            .ok_or_not_found("Job category")
    }

    async fn update_category(&self, id: Uuid, category: NewCategory) -> AppResult<JobCategory> {
        let category = NewCategory {
            name: category.name.trim().to_string(),
            ..category
        };
        let updated = self.uow.catalog().update_category(id, category).await?;
        tracing::info!(category_id = %id, name = %updated.name, "Job category updated");
        Ok(updated)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.uow.catalog().delete_category(id).await?;
        tracing::info!(category_id = %id, "Job category deleted");
        Ok(())
    }
}
