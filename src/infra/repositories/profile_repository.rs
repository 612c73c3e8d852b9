//! Job seeker and employer profile repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::{city, employer, job_seeker, user};
use crate::domain::{
    CatalogEntry, City, EmployerProfile, JobSeekerProfile, ProfessionalCard, ProfileVisibility,
    UserStatus,
};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobSeekerRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<JobSeekerProfile>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobSeekerProfile>>;

    /// Persist every column of an already loaded profile
    async fn save(&self, profile: JobSeekerProfile) -> AppResult<JobSeekerProfile>;

    /// Public profiles of active accounts, most complete first
    async fn list_public(&self, offset: u64, limit: u64) -> AppResult<(Vec<ProfessionalCard>, u64)>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmployerRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<EmployerProfile>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EmployerProfile>>;

    async fn save(&self, profile: EmployerProfile) -> AppResult<EmployerProfile>;
}

pub struct JobSeekerStore {
    db: DatabaseConnection,
}

impl JobSeekerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobSeekerRepository for JobSeekerStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<JobSeekerProfile>> {
        let model = job_seeker::Entity::find()
            .filter(job_seeker::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(JobSeekerProfile::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobSeekerProfile>> {
        let model = job_seeker::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(JobSeekerProfile::from))
    }

    async fn save(&self, profile: JobSeekerProfile) -> AppResult<JobSeekerProfile> {
        let model = job_seeker::ActiveModel::from(&profile)
            .update(&self.db)
            .await?;
        Ok(JobSeekerProfile::from(model))
    }

    async fn list_public(&self, offset: u64, limit: u64) -> AppResult<(Vec<ProfessionalCard>, u64)> {
        let active_users = Query::select()
            .column(user::Column::Id)
            .from(user::Entity)
            .and_where(user::Column::Status.eq(UserStatus::Active.as_str()))
            .to_owned();
        let query = job_seeker::Entity::find()
            .filter(job_seeker::Column::ProfileVisibility.eq(ProfileVisibility::Public.as_str()))
            .filter(job_seeker::Column::UserId.in_subquery(active_users));

        let total = query.clone().count(&self.db).await?;
        let profiles: Vec<JobSeekerProfile> = query
            .order_by_desc(job_seeker::Column::ProfileCompleteness)
            .order_by_desc(job_seeker::Column::UpdatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobSeekerProfile::from)
            .collect();
        if profiles.is_empty() {
            return Ok((Vec::new(), total));
        }

        let users: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(profiles.iter().map(|p| p.user_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let cities: HashMap<Uuid, CatalogEntry> = city::Entity::find()
            .filter(city::Column::Id.is_in(profiles.iter().filter_map(|p| p.city_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                let entry = CatalogEntry::from(&City::from(m));
                (entry.id, entry)
            })
            .collect();

        let cards = profiles
            .into_iter()
            .filter_map(|profile| {
                let owner = users.get(&profile.user_id)?;
                let city = profile.city_id.and_then(|id| cities.get(&id).cloned());
                Some(ProfessionalCard::new(
                    profile,
                    owner.first_name.clone(),
                    owner.last_name.clone(),
                    city,
                ))
            })
            .collect();
        Ok((cards, total))
    }
}

pub struct EmployerStore {
    db: DatabaseConnection,
}

impl EmployerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployerRepository for EmployerStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<EmployerProfile>> {
        let model = employer::Entity::find()
            .filter(employer::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(EmployerProfile::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EmployerProfile>> {
        let model = employer::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(EmployerProfile::from))
    }

    async fn save(&self, profile: EmployerProfile) -> AppResult<EmployerProfile> {
        let model = employer::ActiveModel::from(&profile).update(&self.db).await?;
        Ok(EmployerProfile::from(model))
    }
}
