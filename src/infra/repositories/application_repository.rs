//! Application repository implementation.
//!
//! Submission and deletion keep `job_posts.application_count` in step with the
//! application rows inside one transaction. The unique index on
//! `(job_seeker_id, job_post_id)` is the only duplicate guard, so submission
//! inserts before it claims a slot: a repeat application reports itself as a
//! duplicate even when the post is full or closed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    application::{self, Entity as ApplicationEntity},
    application_status::{self, Entity as HistoryEntity},
    city, employer, job_category, job_post, job_seeker, job_type, user,
};
use super::is_unique_violation;
use crate::domain::{
    ApplicantSummary, Application, ApplicationStatus, ApplicationView, CatalogEntry, City,
    EmployerSummary, JobCategory, JobPostStatus, JobSummary, JobType, NewApplication,
    StatusChange, StatusEntry,
};
use crate::errors::{AppError, AppResult, OptionExt, Transition};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert the application in status `Applied` and claim a slot on the post.
    ///
    /// Fails with `DuplicateApplication` when the seeker already applied and
    /// with a validation error when the post is not open or has no capacity
    /// left.
    async fn submit(&self, application: NewApplication) -> AppResult<Application>;

    /// Application with its history, oldest entry first
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>>;

    /// Move from `change.from` to `change.status` and append one history
    /// entry. Fails with `InvalidTransition` when the stored status is no
    /// longer `change.from`.
    async fn update_status(&self, id: Uuid, change: StatusChange) -> AppResult<Application>;

    /// Remove the application and its history and release the post slot
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Newest first
    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<ApplicationView>>;

    /// Applications on every post owned by the employer, newest first
    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<ApplicationView>>;

    async fn count_for_post(&self, job_post_id: Uuid) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct ApplicationStore {
    db: DatabaseConnection,
}

impl ApplicationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn history(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<StatusEntry>>> {
        let mut grouped: HashMap<Uuid, Vec<StatusEntry>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let rows = HistoryEntity::find()
            .filter(application_status::Column::ApplicationId.is_in(ids.to_vec()))
            .order_by_asc(application_status::Column::UpdatedAt)
            .order_by_asc(application_status::Column::Seq)
            .all(&self.db)
            .await?;

        for row in rows {
            let application_id = row.application_id;
            grouped
                .entry(application_id)
                .or_default()
                .push(StatusEntry::try_from(row)?);
        }
        Ok(grouped)
    }

    /// Join applications with job, employer, catalog and applicant summaries.
    async fn assemble(&self, models: Vec<application::Model>) -> AppResult<Vec<ApplicationView>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let post_ids: Vec<Uuid> = models.iter().map(|m| m.job_post_id).collect();
        let seeker_ids: Vec<Uuid> = models.iter().map(|m| m.job_seeker_id).collect();

        let mut history = self.history(&ids).await?;

        let posts: HashMap<Uuid, job_post::Model> = job_post::Entity::find()
            .filter(job_post::Column::Id.is_in(post_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let employer_ids: Vec<Uuid> = posts.values().map(|p| p.employer_id).collect();
        let employers: HashMap<Uuid, EmployerSummary> = employer::Entity::find()
            .filter(employer::Column::Id.is_in(employer_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| {
                let summary = EmployerSummary {
                    id: e.id,
                    company_name: e.company_name,
                    logo_url: e.logo_url,
                };
                (summary.id, summary)
            })
            .collect();

        let categories: HashMap<Uuid, CatalogEntry> = job_category::Entity::find()
            .filter(job_category::Column::Id.is_in(posts.values().filter_map(|p| p.category_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                let entry = CatalogEntry::from(&JobCategory::from(m));
                (entry.id, entry)
            })
            .collect();

        let job_types: HashMap<Uuid, CatalogEntry> = job_type::Entity::find()
            .filter(job_type::Column::Id.is_in(posts.values().filter_map(|p| p.job_type_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                let entry = CatalogEntry::from(&JobType::from(m));
                (entry.id, entry)
            })
            .collect();

        let cities: HashMap<Uuid, CatalogEntry> = city::Entity::find()
            .filter(city::Column::Id.is_in(posts.values().filter_map(|p| p.city_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                let entry = CatalogEntry::from(&City::from(m));
                (entry.id, entry)
            })
            .collect();

        let seekers: HashMap<Uuid, job_seeker::Model> = job_seeker::Entity::find()
            .filter(job_seeker::Column::Id.is_in(seeker_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let users: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(seekers.values().map(|s| s.user_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut views = Vec::with_capacity(models.len());
        for model in models {
            let job = match posts.get(&model.job_post_id) {
                Some(post) => Some(JobSummary {
                    id: post.id,
                    title: post.title.clone(),
                    status: post.status.parse()?,
                    deadline: post.deadline,
                    employer: employers.get(&post.employer_id).cloned(),
                    category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                    job_type: post.job_type_id.and_then(|id| job_types.get(&id).cloned()),
                    city: post.city_id.and_then(|id| cities.get(&id).cloned()),
                }),
                None => None,
            };

            let applicant = seekers.get(&model.job_seeker_id).and_then(|seeker| {
                users.get(&seeker.user_id).map(|u| ApplicantSummary {
                    id: seeker.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    university: seeker.university.clone(),
                    field_of_study: seeker.field_of_study.clone(),
                })
            });

            let entries = history.remove(&model.id).unwrap_or_default();
            views.push(ApplicationView {
                application: into_application(model, entries)?,
                job,
                applicant,
            });
        }
        Ok(views)
    }
}

fn into_application(model: application::Model, history: Vec<StatusEntry>) -> AppResult<Application> {
    Ok(Application {
        id: model.id,
        job_seeker_id: model.job_seeker_id,
        job_post_id: model.job_post_id,
        resume_url: model.resume_url,
        cover_letter_url: model.cover_letter_url,
        notes: model.notes,
        status: model.status.parse()?,
        employer_notes: model.employer_notes,
        applied_at: model.applied_at,
        updated_at: model.updated_at,
        status_history: history,
    })
}

async fn release_slot(txn: &DatabaseTransaction, job_post_id: Uuid) -> AppResult<()> {
    job_post::Entity::update_many()
        .col_expr(
            job_post::Column::ApplicationCount,
            Expr::col(job_post::Column::ApplicationCount).sub(1),
        )
        .filter(job_post::Column::Id.eq(job_post_id))
        .filter(job_post::Column::ApplicationCount.gt(0))
        .exec(txn)
        .await?;
    Ok(())
}

#[async_trait]
impl ApplicationRepository for ApplicationStore {
    async fn submit(&self, new: NewApplication) -> AppResult<Application> {
        let now = Utc::now();
        let job_post_id = new.job_post_id;
        let txn = self.db.begin().await?;

        let active_model = application::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_seeker_id: Set(new.job_seeker_id),
            job_post_id: Set(job_post_id),
            resume_url: Set(new.resume_url),
            cover_letter_url: Set(new.cover_letter_url),
            notes: Set(new.notes),
            status: Set(ApplicationStatus::Applied.as_str().to_string()),
            employer_notes: Set(None),
            applied_at: Set(now),
            updated_at: Set(now),
        };

        let model = match active_model.insert(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                txn.rollback().await?;
                return Err(AppError::DuplicateApplication);
            }
            Err(e) => return Err(e.into()),
        };

        let claimed = job_post::Entity::update_many()
            .col_expr(
                job_post::Column::ApplicationCount,
                Expr::col(job_post::Column::ApplicationCount).add(1),
            )
            .filter(job_post::Column::Id.eq(job_post_id))
            .filter(job_post::Column::IsActive.eq(true))
            .filter(job_post::Column::IsApproved.eq(true))
            .filter(job_post::Column::Status.eq(JobPostStatus::Published.as_str()))
            .filter(job_post::Column::Deadline.gte(now))
            .filter(
                Expr::col(job_post::Column::ApplicationCount)
                    .lt(Expr::col(job_post::Column::MaxApplications)),
            )
            .exec(&txn)
            .await?
            .rows_affected;

        if claimed == 0 {
            txn.rollback().await?;
            return Err(AppError::validation(
                "This job is no longer accepting applications",
            ));
        }

        txn.commit().await?;
        into_application(model, Vec::new())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        let Some(model) = ApplicationEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let history = self.history(&[id]).await?.remove(&id).unwrap_or_default();
        into_application(model, history).map(Some)
    }

    async fn update_status(&self, id: Uuid, change: StatusChange) -> AppResult<Application> {
        let txn = self.db.begin().await?;

        let updated = ApplicationEntity::update_many()
            .col_expr(application::Column::Status, Expr::value(change.status.as_str()))
            .col_expr(application::Column::UpdatedAt, Expr::value(change.at))
            .filter(application::Column::Id.eq(id))
            .filter(application::Column::Status.eq(change.from.as_str()))
            .exec(&txn)
            .await?
            .rows_affected;

        if updated == 0 {
            let current = ApplicationEntity::find_by_id(id).one(&txn).await?;
            txn.rollback().await?;
            let current = current.ok_or_not_found("Application")?;
            return Err(AppError::InvalidTransition(Transition::Application(
                current.status.parse()?,
                change.status,
            )));
        }

        application_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            application_id: Set(id),
            status: Set(change.status.as_str().to_string()),
            updated_by: Set(change.updated_by),
            updated_at: Set(change.at),
            notes: Set(change.notes),
            seq: NotSet,
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        self.find_by_id(id).await?.ok_or_not_found("Application")
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let Some(model) = ApplicationEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(AppError::not_found("Application"));
        };

        HistoryEntity::delete_many()
            .filter(application_status::Column::ApplicationId.eq(id))
            .exec(&txn)
            .await?;
        ApplicationEntity::delete_by_id(id).exec(&txn).await?;
        release_slot(&txn, model.job_post_id).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<ApplicationView>> {
        let models = ApplicationEntity::find()
            .filter(application::Column::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(application::Column::AppliedAt)
            .all(&self.db)
            .await?;
        self.assemble(models).await
    }

    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<ApplicationView>> {
        let post_ids: Vec<Uuid> = job_post::Entity::find()
            .filter(job_post::Column::EmployerId.eq(employer_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ApplicationEntity::find()
            .filter(application::Column::JobPostId.is_in(post_ids))
            .order_by_desc(application::Column::AppliedAt)
            .all(&self.db)
            .await?;
        self.assemble(models).await
    }

    async fn count_for_post(&self, job_post_id: Uuid) -> AppResult<u64> {
        Ok(ApplicationEntity::find()
            .filter(application::Column::JobPostId.eq(job_post_id))
            .count(&self.db)
            .await?)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(ApplicationEntity::find().count(&self.db).await?)
    }
}
