//! Job post repository implementation.
//!
//! Counters and lifecycle columns are only ever written by single UPDATE
//! statements so a concurrent content edit cannot roll them back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::{
    job_post::{self, content_changes, Entity as JobPostEntity},
    to_json,
};
use crate::domain::{AdminPostFilter, JobPost, JobPostFilter, JobPostStatus, NewJobPost};
use crate::errors::{AppError, AppResult, OptionExt, Transition};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobPostRepository: Send + Sync {
    /// Insert as an unapproved, active draft owned by `employer_id`
    async fn create(&self, employer_id: Uuid, post: NewJobPost) -> AppResult<JobPost>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>>;

    /// Bump `view_count` and return the post as stored afterwards
    async fn record_view(&self, id: Uuid) -> AppResult<Option<JobPost>>;

    /// Write content columns only
    async fn update_content(&self, post: JobPost) -> AppResult<JobPost>;

    /// Move `from` to `to`. Fails with `InvalidTransition` when the stored
    /// status is no longer `from`.
    async fn set_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<JobPost>;

    /// Approve and publish in one statement. `None` when the post was already
    /// approved and published by the time the statement ran.
    async fn approve(
        &self,
        id: Uuid,
        admin_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<JobPost>>;

    /// Close and hide. Repeating it is harmless.
    async fn soft_delete(&self, id: Uuid) -> AppResult<JobPost>;

    /// Publicly visible posts, featured then newest first
    async fn list_public(
        &self,
        filter: JobPostFilter,
        now: DateTime<Utc>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)>;

    async fn list_by_employer(&self, employer_id: Uuid) -> AppResult<Vec<JobPost>>;

    async fn list_admin(
        &self,
        filter: AdminPostFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)>;

    /// Move published posts whose deadline has passed to `Expired`
    async fn expire_past_deadline(&self, now: DateTime<Utc>) -> AppResult<u64>;

    async fn count_pending(&self) -> AppResult<u64>;

    async fn count_by_status(&self, status: JobPostStatus) -> AppResult<u64>;
}

pub struct JobPostStore {
    db: DatabaseConnection,
}

impl JobPostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: Uuid) -> AppResult<JobPost> {
        JobPostEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(JobPost::try_from)
            .transpose()?
            .ok_or_not_found("Job post")
    }

    async fn page(
        &self,
        query: Select<JobPostEntity>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)> {
        let total = query.clone().count(&self.db).await?;
        let posts = query
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobPost::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((posts, total))
    }
}

fn keyword_condition(keyword: &str) -> Condition {
    let pattern = format!("%{}%", keyword.to_lowercase());
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(job_post::Column::Title))).like(pattern.clone()))
        .add(
            Expr::expr(Func::lower(Expr::col(job_post::Column::Description)))
                .like(pattern.clone()),
        )
        .add(Expr::cust_with_values(
            "LOWER(\"job_posts\".\"tags\"::text) LIKE $1",
            [pattern],
        ))
}

/// Column form of `JobPost::is_pending_approval`.
fn pending_condition() -> Condition {
    Condition::all()
        .add(job_post::Column::IsActive.eq(true))
        .add(job_post::Column::IsApproved.eq(false))
        .add(job_post::Column::Status.is_in(JobPost::PENDING_STATUSES.map(|s| s.as_str())))
}

fn admin_condition(filter: AdminPostFilter) -> Condition {
    match filter {
        AdminPostFilter::All => Condition::all(),
        AdminPostFilter::Pending => pending_condition(),
        AdminPostFilter::Status(JobPostStatus::Closed) => Condition::any()
            .add(job_post::Column::Status.eq(JobPostStatus::Closed.as_str()))
            .add(job_post::Column::IsActive.eq(false)),
        AdminPostFilter::Status(status) => Condition::all()
            .add(job_post::Column::Status.eq(status.as_str()))
            .add(job_post::Column::IsActive.eq(true)),
    }
}

#[async_trait]
impl JobPostRepository for JobPostStore {
    async fn create(&self, employer_id: Uuid, post: NewJobPost) -> AppResult<JobPost> {
        let now = Utc::now();
        let max_applications = post.max_applications();

        let active_model = job_post::ActiveModel {
            id: Set(Uuid::new_v4()),
            employer_id: Set(employer_id),
            title: Set(post.title),
            description: Set(post.description),
            responsibilities: Set(to_json(&post.responsibilities)),
            requirements: Set(to_json(&post.requirements)),
            preferred_skills: Set(to_json(&post.preferred_skills)),
            experience_level: Set(post.experience_level.as_str().to_string()),
            experience_min_years: Set(post.experience_min_years),
            experience_max_years: Set(post.experience_max_years),
            category_id: Set(post.category_id),
            job_type_id: Set(post.job_type_id),
            city_id: Set(post.city_id),
            salary_min: Set(post.salary.min),
            salary_max: Set(post.salary.max),
            salary_currency: Set(post.salary.currency),
            salary_negotiable: Set(post.salary.negotiable),
            benefits: Set(to_json(&post.benefits)),
            work_arrangement: Set(post.work_arrangement.as_str().to_string()),
            deadline: Set(post.deadline),
            tags: Set(to_json(&post.tags)),
            max_applications: Set(max_applications),
            view_count: Set(0),
            application_count: Set(0),
            featured: Set(false),
            status: Set(JobPostStatus::Draft.as_str().to_string()),
            is_approved: Set(false),
            approved_by: Set(None),
            approved_at: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        JobPost::try_from(active_model.insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        JobPostEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(JobPost::try_from)
            .transpose()
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        let result = JobPostEntity::update_many()
            .col_expr(
                job_post::Column::ViewCount,
                Expr::col(job_post::Column::ViewCount).add(1),
            )
            .filter(job_post::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn update_content(&self, post: JobPost) -> AppResult<JobPost> {
        let model = content_changes(&post).update(&self.db).await?;
        JobPost::try_from(model)
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<JobPost> {
        let result = JobPostEntity::update_many()
            .col_expr(job_post::Column::Status, Expr::value(to.as_str()))
            .col_expr(job_post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(job_post::Column::Id.eq(id))
            .filter(job_post::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        let current = self.require(id).await?;
        if result.rows_affected == 0 {
            return Err(AppError::InvalidTransition(Transition::JobPost(
                current.status,
                to,
            )));
        }
        Ok(current)
    }

    async fn approve(
        &self,
        id: Uuid,
        admin_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<JobPost>> {
        let already_live = Condition::all()
            .add(job_post::Column::IsApproved.eq(true))
            .add(job_post::Column::Status.eq(JobPostStatus::Published.as_str()));

        let result = JobPostEntity::update_many()
            .col_expr(job_post::Column::IsApproved, Expr::value(true))
            .col_expr(
                job_post::Column::Status,
                Expr::value(JobPostStatus::Published.as_str()),
            )
            .col_expr(job_post::Column::ApprovedBy, Expr::value(Some(admin_id)))
            .col_expr(job_post::Column::ApprovedAt, Expr::value(Some(at)))
            .col_expr(job_post::Column::UpdatedAt, Expr::value(at))
            .filter(job_post::Column::Id.eq(id))
            .filter(already_live.not())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<JobPost> {
        JobPostEntity::update_many()
            .col_expr(
                job_post::Column::Status,
                Expr::value(JobPostStatus::Closed.as_str()),
            )
            .col_expr(job_post::Column::IsActive, Expr::value(false))
            .col_expr(job_post::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(job_post::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        self.require(id).await
    }

    async fn list_public(
        &self,
        filter: JobPostFilter,
        now: DateTime<Utc>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)> {
        let mut query = JobPostEntity::find()
            .filter(job_post::Column::IsActive.eq(true))
            .filter(job_post::Column::IsApproved.eq(true))
            .filter(job_post::Column::Status.eq(JobPostStatus::Published.as_str()))
            .filter(job_post::Column::Deadline.gte(now));

        if let Some(category_id) = filter.category_id {
            query = query.filter(job_post::Column::CategoryId.eq(category_id));
        }
        if let Some(job_type_id) = filter.job_type_id {
            query = query.filter(job_post::Column::JobTypeId.eq(job_type_id));
        }
        if let Some(city_id) = filter.city_id {
            query = query.filter(job_post::Column::CityId.eq(city_id));
        }
        if let Some(keyword) = filter.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() {
                query = query.filter(keyword_condition(keyword));
            }
        }

        let query = query
            .order_by_desc(job_post::Column::Featured)
            .order_by_desc(job_post::Column::CreatedAt);
        self.page(query, offset, limit).await
    }

    async fn list_by_employer(&self, employer_id: Uuid) -> AppResult<Vec<JobPost>> {
        JobPostEntity::find()
            .filter(job_post::Column::EmployerId.eq(employer_id))
            .filter(job_post::Column::IsActive.eq(true))
            .order_by_desc(job_post::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobPost::try_from)
            .collect()
    }

    async fn list_admin(
        &self,
        filter: AdminPostFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)> {
        let query = JobPostEntity::find()
            .filter(admin_condition(filter))
            .order_by_desc(job_post::Column::CreatedAt);
        self.page(query, offset, limit).await
    }

    async fn expire_past_deadline(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = JobPostEntity::update_many()
            .col_expr(
                job_post::Column::Status,
                Expr::value(JobPostStatus::Expired.as_str()),
            )
            .col_expr(job_post::Column::UpdatedAt, Expr::value(now))
            .filter(job_post::Column::Status.eq(JobPostStatus::Published.as_str()))
            .filter(job_post::Column::Deadline.lt(now))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_pending(&self) -> AppResult<u64> {
        Ok(JobPostEntity::find()
            .filter(pending_condition())
            .count(&self.db)
            .await?)
    }

    async fn count_by_status(&self, status: JobPostStatus) -> AppResult<u64> {
        Ok(JobPostEntity::find()
            .filter(job_post::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?)
    }
}
