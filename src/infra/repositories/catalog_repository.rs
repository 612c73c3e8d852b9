//! Catalog lookups: categories, job types and cities.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{city, job_category, job_type};
use super::is_unique_violation;
use crate::domain::{City, JobCategory, JobType, NewCategory, NewJobType};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Active categories ordered by name
    async fn categories(&self) -> AppResult<Vec<JobCategory>>;

    async fn job_types(&self) -> AppResult<Vec<JobType>>;

    async fn cities(&self) -> AppResult<Vec<City>>;

    /// `Conflict` when the name is taken
    async fn create_category(&self, category: NewCategory) -> AppResult<JobCategory>;

    async fn create_job_type(&self, job_type: NewJobType) -> AppResult<JobType>;

    async fn find_category(&self, id: Uuid) -> AppResult<Option<JobCategory>>;

    /// Replace name and description. `Conflict` when the name is taken.
    async fn update_category(&self, id: Uuid, category: NewCategory) -> AppResult<JobCategory>;

    /// Posts in the category keep existing with no category.
    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn categories(&self) -> AppResult<Vec<JobCategory>> {
        Ok(job_category::Entity::find()
            .filter(job_category::Column::IsActive.eq(true))
            .order_by_asc(job_category::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobCategory::from)
            .collect())
    }

    async fn job_types(&self) -> AppResult<Vec<JobType>> {
        Ok(job_type::Entity::find()
            .filter(job_type::Column::IsActive.eq(true))
            .order_by_asc(job_type::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobType::from)
            .collect())
    }

    async fn cities(&self) -> AppResult<Vec<City>> {
        Ok(city::Entity::find()
            .filter(city::Column::IsActive.eq(true))
            .order_by_asc(city::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(City::from)
            .collect())
    }

    async fn create_category(&self, category: NewCategory) -> AppResult<JobCategory> {
        let active_model = job_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(category.name.trim().to_string()),
            description: Set(category.description),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(JobCategory::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict("Job category")),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_job_type(&self, job_type: NewJobType) -> AppResult<JobType> {
        let active_model = job_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(job_type.name.trim().to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(JobType::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict("Job type")),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<JobCategory>> {
        Ok(job_category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(JobCategory::from))
    }

    async fn update_category(&self, id: Uuid, category: NewCategory) -> AppResult<JobCategory> {
        let mut active_model = job_category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Job category")?
            .into_active_model();
        active_model.name = Set(category.name.trim().to_string());
        active_model.description = Set(category.description);

        match active_model.update(&self.db).await {
            Ok(model) => Ok(JobCategory::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict("Job category")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        let result = job_category::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Job category"));
        }
        Ok(())
    }
}
