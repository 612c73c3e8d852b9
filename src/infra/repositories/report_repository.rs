//! Read-only aggregates behind the admin reports.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, IntoColumnRef, Query},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::{application, employer, job_category, job_post, job_seeker, job_type, user};
use crate::domain::{
    ApplicationReport, ApplicationReportFilter, ApplicationReportRow, ApplicationStats,
    ApplicationStatus, JobAnalyticsFilter, JobMetrics,
};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// One row per matching post with its application counts, unordered
    async fn job_metrics(&self, filter: JobAnalyticsFilter) -> AppResult<Vec<JobMetrics>>;

    /// The newest `limit` matching applications plus stats over all matches
    async fn application_report(
        &self,
        filter: ApplicationReportFilter,
        limit: u64,
    ) -> AppResult<ApplicationReport>;
}

pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Display names keyed by id for any catalog-like table.
    async fn names<E: EntityTrait>(
        &self,
        ids: Vec<Uuid>,
        id: E::Column,
        name: E::Column,
    ) -> AppResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(E::find()
            .select_only()
            .column(id)
            .column(name)
            .filter(id.is_in(ids))
            .into_tuple::<(Uuid, String)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect())
    }
}

fn post_condition(filter: &JobAnalyticsFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(since) = filter.since {
        condition = condition.add(job_post::Column::CreatedAt.gte(since));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(job_post::Column::CategoryId.eq(category_id));
    }
    if let Some(job_type_id) = filter.job_type_id {
        condition = condition.add(job_post::Column::JobTypeId.eq(job_type_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(job_post::Column::Status.eq(status.as_str()));
    }
    condition
}

fn lower(column: impl IntoColumnRef) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

/// Applicant first or last name, or the post title, contains `term`.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.to_lowercase());

    let named_seekers = Query::select()
        .column((job_seeker::Entity, job_seeker::Column::Id))
        .from(job_seeker::Entity)
        .inner_join(
            user::Entity,
            Expr::col((user::Entity, user::Column::Id))
                .equals((job_seeker::Entity, job_seeker::Column::UserId)),
        )
        .cond_where(
            Condition::any()
                .add(lower((user::Entity, user::Column::FirstName)).like(pattern.clone()))
                .add(lower((user::Entity, user::Column::LastName)).like(pattern.clone())),
        )
        .to_owned();

    let titled_posts = Query::select()
        .column((job_post::Entity, job_post::Column::Id))
        .from(job_post::Entity)
        .and_where(lower((job_post::Entity, job_post::Column::Title)).like(pattern))
        .to_owned();

    Condition::any()
        .add(application::Column::JobSeekerId.in_subquery(named_seekers))
        .add(application::Column::JobPostId.in_subquery(titled_posts))
}

fn application_condition(filter: &ApplicationReportFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(since) = filter.since {
        condition = condition.add(application::Column::AppliedAt.gte(since));
    }
    if let Some(status) = filter.status {
        condition = condition.add(application::Column::Status.eq(status.as_str()));
    }
    if let Some(term) = filter.search.as_deref() {
        condition = condition.add(search_condition(term));
    }
    condition
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn job_metrics(&self, filter: JobAnalyticsFilter) -> AppResult<Vec<JobMetrics>> {
        let posts = job_post::Entity::find()
            .filter(post_condition(&filter))
            .all(&self.db)
            .await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let counts: Vec<(Uuid, String, i64)> = application::Entity::find()
            .select_only()
            .column(application::Column::JobPostId)
            .column(application::Column::Status)
            .column_as(Expr::col(application::Column::Id).count(), "n")
            .filter(application::Column::JobPostId.is_in(posts.iter().map(|p| p.id)))
            .group_by(application::Column::JobPostId)
            .group_by(application::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut by_post: HashMap<Uuid, (u64, u64, u64)> = HashMap::new();
        for (post_id, status, n) in counts {
            let n = n.max(0) as u64;
            let entry = by_post.entry(post_id).or_default();
            entry.0 += n;
            match status.parse::<ApplicationStatus>()? {
                ApplicationStatus::Shortlisted => entry.1 += n,
                ApplicationStatus::Rejected => entry.2 += n,
                _ => {}
            }
        }

        let employers = self
            .names::<employer::Entity>(
                posts.iter().map(|p| p.employer_id).collect(),
                employer::Column::Id,
                employer::Column::CompanyName,
            )
            .await?;
        let categories = self
            .names::<job_category::Entity>(
                posts.iter().filter_map(|p| p.category_id).collect(),
                job_category::Column::Id,
                job_category::Column::Name,
            )
            .await?;
        let job_types = self
            .names::<job_type::Entity>(
                posts.iter().filter_map(|p| p.job_type_id).collect(),
                job_type::Column::Id,
                job_type::Column::Name,
            )
            .await?;

        posts
            .into_iter()
            .map(|post| {
                let (applied, shortlisted, rejected) =
                    by_post.get(&post.id).copied().unwrap_or_default();
                Ok(JobMetrics {
                    id: post.id,
                    status: post.status.parse()?,
                    view_count: post.view_count,
                    applied_count: applied,
                    shortlisted_count: shortlisted,
                    rejected_count: rejected,
                    employer_name: employers.get(&post.employer_id).cloned(),
                    category_name: post.category_id.and_then(|id| categories.get(&id).cloned()),
                    type_name: post.job_type_id.and_then(|id| job_types.get(&id).cloned()),
                    title: post.title,
                })
            })
            .collect()
    }

    async fn application_report(
        &self,
        filter: ApplicationReportFilter,
        limit: u64,
    ) -> AppResult<ApplicationReport> {
        let condition = application_condition(&filter);

        let counts: Vec<(String, i64)> = application::Entity::find()
            .select_only()
            .column(application::Column::Status)
            .column_as(Expr::col(application::Column::Id).count(), "n")
            .filter(condition.clone())
            .group_by(application::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;
        let stats = ApplicationStats::from_counts(
            counts
                .into_iter()
                .map(|(status, n)| Ok((status.parse::<ApplicationStatus>()?, n.max(0) as u64)))
                .collect::<AppResult<Vec<_>>>()?,
        );

        let models = application::Entity::find()
            .filter(condition)
            .order_by_desc(application::Column::AppliedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        if models.is_empty() {
            return Ok(ApplicationReport {
                applications: Vec::new(),
                stats,
            });
        }

        let seekers: HashMap<Uuid, Uuid> = job_seeker::Entity::find()
            .filter(job_seeker::Column::Id.is_in(models.iter().map(|m| m.job_seeker_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.user_id))
            .collect();
        let users: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(seekers.values().copied()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let posts: HashMap<Uuid, job_post::Model> = job_post::Entity::find()
            .filter(job_post::Column::Id.is_in(models.iter().map(|m| m.job_post_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let companies = self
            .names::<employer::Entity>(
                posts.values().map(|p| p.employer_id).collect(),
                employer::Column::Id,
                employer::Column::CompanyName,
            )
            .await?;

        let applications = models
            .into_iter()
            .map(|model| {
                let applicant = seekers
                    .get(&model.job_seeker_id)
                    .and_then(|user_id| users.get(user_id));
                let post = posts.get(&model.job_post_id);
                Ok(ApplicationReportRow {
                    id: model.id,
                    applicant_name: applicant.map(|u| format!("{} {}", u.first_name, u.last_name)),
                    applicant_email: applicant.map(|u| u.email.clone()),
                    job_title: post.map(|p| p.title.clone()),
                    company_name: post.and_then(|p| companies.get(&p.employer_id).cloned()),
                    status: model.status.parse()?,
                    applied_at: model.applied_at,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ApplicationReport { applications, stats })
    }
}
