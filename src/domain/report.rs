//! Admin reporting: per-post analytics and the application report.
//!
//! Query strings use `all` for "no filter" on every field, so the filters
//! parse from raw strings instead of deserializing straight into ids.

use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Application, ApplicationStatus, JobPost, JobPostStatus};
use crate::errors::{AppError, AppResult};

/// Window on creation (posts) or submission (applications) time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Last30Days,
    Last6Months,
    LastYear,
}

impl DateRange {
    /// Oldest instant inside the window, `None` for `All`.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::All => None,
            DateRange::Last30Days => Some(now - Duration::days(30)),
            DateRange::Last6Months => now.checked_sub_months(Months::new(6)),
            DateRange::LastYear => now.checked_sub_months(Months::new(12)),
        }
    }
}

impl FromStr for DateRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "last30days" => Ok(DateRange::Last30Days),
            "last6months" => Ok(DateRange::Last6Months),
            "lastyear" => Ok(DateRange::LastYear),
            other => Err(AppError::validation(format!("Invalid date range '{}'", other))),
        }
    }
}

/// `None` for a missing or `all` query value.
fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn parse_id(field: &str, value: Option<&str>) -> AppResult<Option<Uuid>> {
    selected(value)
        .map(|v| {
            Uuid::parse_str(v).map_err(|_| AppError::validation(format!("Invalid {} id", field)))
        })
        .transpose()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobAnalyticsFilter {
    pub since: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub status: Option<JobPostStatus>,
}

impl JobAnalyticsFilter {
    pub fn parse(
        date_range: Option<&str>,
        category: Option<&str>,
        job_type: Option<&str>,
        status: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            since: date_range.unwrap_or_default().parse::<DateRange>()?.since(now),
            category_id: parse_id("category", category)?,
            job_type_id: parse_id("job type", job_type)?,
            status: selected(status).map(str::parse).transpose()?,
        })
    }

    pub fn matches(&self, post: &JobPost) -> bool {
        self.since.map_or(true, |since| post.created_at >= since)
            && (self.category_id.is_none() || self.category_id == post.category_id)
            && (self.job_type_id.is_none() || self.job_type_id == post.job_type_id)
            && self.status.map_or(true, |status| post.status == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationReportFilter {
    pub since: Option<DateTime<Utc>>,
    pub status: Option<ApplicationStatus>,
    /// Applicant first or last name, or job title; case-insensitive
    pub search: Option<String>,
}

impl ApplicationReportFilter {
    pub fn parse(
        date_range: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            since: date_range.unwrap_or_default().parse::<DateRange>()?.since(now),
            status: selected(status).map(str::parse).transpose()?,
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        })
    }

    /// `names` are the applicant's first and last name, `job_title` the post's.
    pub fn matches(&self, application: &Application, names: [&str; 2], job_title: &str) -> bool {
        if self.since.is_some_and(|since| application.applied_at < since) {
            return false;
        }
        if self.status.is_some_and(|status| application.status != status) {
            return false;
        }
        match &self.search {
            Some(term) => names
                .into_iter()
                .chain([job_title])
                .any(|text| text.to_lowercase().contains(term.as_str())),
            None => true,
        }
    }
}

/// One post in the analytics table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobMetrics {
    pub id: Uuid,
    pub title: String,
    pub status: JobPostStatus,
    pub view_count: i32,
    pub applied_count: u64,
    pub shortlisted_count: u64,
    pub rejected_count: u64,
    pub employer_name: Option<String>,
    pub category_name: Option<String>,
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobTotals {
    pub total_jobs: u64,
    pub total_applications: u64,
    pub total_shortlisted: u64,
    pub total_rejected: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalytics {
    /// Most applied first
    pub job_post_metrics: Vec<JobMetrics>,
    pub totals: JobTotals,
}

impl JobAnalytics {
    pub fn new(mut metrics: Vec<JobMetrics>) -> Self {
        metrics.sort_by(|a, b| b.applied_count.cmp(&a.applied_count));
        let totals = metrics.iter().fold(JobTotals::default(), |acc, m| JobTotals {
            total_jobs: acc.total_jobs + 1,
            total_applications: acc.total_applications + m.applied_count,
            total_shortlisted: acc.total_shortlisted + m.shortlisted_count,
            total_rejected: acc.total_rejected + m.rejected_count,
        });
        Self {
            job_post_metrics: metrics,
            totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReportRow {
    pub id: Uuid,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Counts over every matching application, not only the listed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total_applications: u64,
    pub shortlisted_count: u64,
    pub rejected_count: u64,
    pub under_review_count: u64,
}

impl ApplicationStats {
    pub fn from_counts(counts: impl IntoIterator<Item = (ApplicationStatus, u64)>) -> Self {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, (status, n)| {
                stats.total_applications += n;
                match status {
                    ApplicationStatus::Shortlisted => stats.shortlisted_count += n,
                    ApplicationStatus::Rejected => stats.rejected_count += n,
                    ApplicationStatus::UnderReview => stats.under_review_count += n,
                    _ => {}
                }
                stats
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReport {
    /// Newest first, capped
    pub applications: Vec<ApplicationReportRow>,
    pub stats: ApplicationStats,
}
