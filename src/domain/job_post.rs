//! Job post lifecycle.
//!
//! A post carries two independent state axes: `status` and `is_approved`.
//! Employers move `status` through the table in `JobPostStatus::employer_targets`;
//! only admins flip `is_approved` (see `JobPost::check_approvable`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{DEFAULT_CURRENCY, DEFAULT_MAX_APPLICATIONS};
use crate::errors::{AppError, AppResult, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum JobPostStatus {
    Draft,
    Published,
    Paused,
    Closed,
    Expired,
}

impl JobPostStatus {
    pub const ALL: [JobPostStatus; 5] = [
        JobPostStatus::Draft,
        JobPostStatus::Published,
        JobPostStatus::Paused,
        JobPostStatus::Closed,
        JobPostStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobPostStatus::Draft => "Draft",
            JobPostStatus::Published => "Published",
            JobPostStatus::Paused => "Paused",
            JobPostStatus::Closed => "Closed",
            JobPostStatus::Expired => "Expired",
        }
    }

    /// States an owning employer may move a post to from `self`.
    pub fn employer_targets(&self) -> &'static [JobPostStatus] {
        match self {
            JobPostStatus::Draft => &[JobPostStatus::Closed],
            JobPostStatus::Published => &[JobPostStatus::Paused, JobPostStatus::Closed],
            JobPostStatus::Paused => &[JobPostStatus::Published, JobPostStatus::Closed],
            JobPostStatus::Expired => &[JobPostStatus::Closed],
            JobPostStatus::Closed => &[],
        }
    }
}

impl std::fmt::Display for JobPostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobPostStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Unknown job post status '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Entry Level" => Ok(ExperienceLevel::Entry),
            "Mid Level" => Ok(ExperienceLevel::Mid),
            "Senior Level" => Ok(ExperienceLevel::Senior),
            "Executive" => Ok(ExperienceLevel::Executive),
            other => Err(AppError::validation(format!(
                "Unknown experience level '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkArrangement {
    #[serde(rename = "On-site")]
    OnSite,
    Remote,
    Hybrid,
}

impl WorkArrangement {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkArrangement::OnSite => "On-site",
            WorkArrangement::Remote => "Remote",
            WorkArrangement::Hybrid => "Hybrid",
        }
    }
}

impl FromStr for WorkArrangement {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On-site" => Ok(WorkArrangement::OnSite),
            "Remote" => Ok(WorkArrangement::Remote),
            "Hybrid" => Ok(WorkArrangement::Hybrid),
            other => Err(AppError::validation(format!(
                "Unknown work arrangement '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub min: Option<i32>,
    pub max: Option<i32>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub negotiable: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Salary {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            currency: default_currency(),
            negotiable: false,
        }
    }
}

impl Salary {
    fn check(&self) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(AppError::validation(
                    "Minimum salary cannot exceed maximum salary",
                ));
            }
        }
        Ok(())
    }
}

/// Job post aggregate
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    pub id: Uuid,
    /// Owning employer profile
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub experience_min_years: Option<i32>,
    pub experience_max_years: Option<i32>,
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub salary: Salary,
    pub benefits: Vec<String>,
    pub work_arrangement: WorkArrangement,
    pub deadline: DateTime<Utc>,
    pub tags: Vec<String>,
    pub max_applications: i32,
    pub view_count: i32,
    pub application_count: i32,
    pub featured: bool,
    pub status: JobPostStatus,
    pub is_approved: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPost {
    /// Statuses an unapproved post can wait in for review.
    pub const PENDING_STATUSES: [JobPostStatus; 2] = [JobPostStatus::Draft, JobPostStatus::Paused];

    /// Shown on the public board.
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.status == JobPostStatus::Published
            && self.is_approved
            && self.deadline >= now
    }

    /// Waiting on an admin. Derived, never stored; the store's pending
    /// condition mirrors it column for column.
    pub fn is_pending_approval(&self) -> bool {
        self.is_active
            && !self.is_approved
            && Self::PENDING_STATUSES.contains(&self.status)
    }

    pub fn has_capacity(&self) -> bool {
        self.application_count < self.max_applications
    }

    pub fn is_open_for_applications(&self, now: DateTime<Utc>) -> bool {
        self.is_publicly_visible(now) && self.has_capacity()
    }

    pub fn is_owned_by(&self, employer_id: Uuid) -> bool {
        self.employer_id == employer_id
    }

    /// Employer-initiated move to `next`.
    pub fn check_employer_transition(&self, next: JobPostStatus) -> AppResult<()> {
        if !self.status.employer_targets().contains(&next) {
            return Err(AppError::InvalidTransition(Transition::JobPost(self.status, next)));
        }
        if next == JobPostStatus::Published && !self.is_approved {
            return Err(AppError::validation(
                "Job post must be approved by an admin before it can be published",
            ));
        }
        Ok(())
    }

    pub fn check_approvable(&self) -> AppResult<()> {
        if self.is_approved && self.status == JobPostStatus::Published {
            return Err(AppError::AlreadyApproved);
        }
        Ok(())
    }

    pub fn check_editable(&self) -> AppResult<()> {
        if self.status == JobPostStatus::Closed {
            return Err(AppError::validation("Closed job posts cannot be edited"));
        }
        Ok(())
    }
}

/// Content of a new post. The owner is always the signed-in employer.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPost {
    #[validate(length(min = 3, max = 150, message = "Title must be 3-150 characters"))]
    #[schema(example = "Software Engineering Intern")]
    pub title: String,
    #[validate(length(min = 10, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    #[validate(range(min = 0, max = 50))]
    pub experience_min_years: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub experience_max_years: Option<i32>,
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub work_arrangement: WorkArrangement,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(range(min = 1, max = 10000))]
    pub max_applications: Option<i32>,
}

impl NewJobPost {
    /// Cross-field rules the derive cannot express.
    pub fn check(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.deadline < now {
            return Err(AppError::validation("Deadline must be in the future"));
        }
        if let (Some(min), Some(max)) = (self.experience_min_years, self.experience_max_years) {
            if min > max {
                return Err(AppError::validation(
                    "Minimum experience cannot exceed maximum experience",
                ));
            }
        }
        self.salary.check()
    }

    pub fn max_applications(&self) -> i32 {
        self.max_applications.unwrap_or(DEFAULT_MAX_APPLICATIONS)
    }
}

/// Partial content update from the owner.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPostChanges {
    #[validate(length(min = 3, max = 150, message = "Title must be 3-150 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "Description is too short"))]
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub experience_level: Option<ExperienceLevel>,
    #[validate(range(min = 0, max = 50))]
    pub experience_min_years: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub experience_max_years: Option<i32>,
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub salary: Option<Salary>,
    pub benefits: Option<Vec<String>>,
    pub work_arrangement: Option<WorkArrangement>,
    pub deadline: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    #[validate(range(min = 1, max = 10000))]
    pub max_applications: Option<i32>,
}

impl JobPostChanges {
    /// Apply onto a loaded post; lifecycle fields are never touched here.
    pub fn apply(self, post: &mut JobPost, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(deadline) = self.deadline {
            if deadline < now {
                return Err(AppError::validation("Deadline must be in the future"));
            }
            post.deadline = deadline;
        }
        if let Some(max) = self.max_applications {
            if max < post.application_count {
                return Err(AppError::validation(
                    "Maximum applications cannot be lower than the applications already received",
                ));
            }
            post.max_applications = max;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(description) = self.description {
            post.description = description;
        }
        if let Some(v) = self.responsibilities {
            post.responsibilities = v;
        }
        if let Some(v) = self.requirements {
            post.requirements = v;
        }
        if let Some(v) = self.preferred_skills {
            post.preferred_skills = v;
        }
        if let Some(v) = self.experience_level {
            post.experience_level = v;
        }
        if self.experience_min_years.is_some() {
            post.experience_min_years = self.experience_min_years;
        }
        if self.experience_max_years.is_some() {
            post.experience_max_years = self.experience_max_years;
        }
        if self.category_id.is_some() {
            post.category_id = self.category_id;
        }
        if self.job_type_id.is_some() {
            post.job_type_id = self.job_type_id;
        }
        if self.city_id.is_some() {
            post.city_id = self.city_id;
        }
        if let Some(salary) = self.salary {
            salary.check()?;
            post.salary = salary;
        }
        if let Some(v) = self.benefits {
            post.benefits = v;
        }
        if let Some(v) = self.work_arrangement {
            post.work_arrangement = v;
        }
        if let Some(v) = self.tags {
            post.tags = v;
        }
        post.updated_at = now;
        Ok(())
    }
}

/// Filters for the public board.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPostFilter {
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    /// Matched against title, description and tags
    pub keyword: Option<String>,
}

impl JobPostFilter {
    pub fn matches(&self, post: &JobPost) -> bool {
        if self.category_id.is_some() && self.category_id != post.category_id {
            return false;
        }
        if self.job_type_id.is_some() && self.job_type_id != post.job_type_id {
            return false;
        }
        if self.city_id.is_some() && self.city_id != post.city_id {
            return false;
        }
        match self.keyword.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => {
                let needle = keyword.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.description.to_lowercase().contains(&needle)
                    || post.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Status filter for the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPostFilter {
    All,
    /// See `JobPost::is_pending_approval`
    Pending,
    Status(JobPostStatus),
}

impl AdminPostFilter {
    pub fn matches(&self, post: &JobPost) -> bool {
        match self {
            AdminPostFilter::All => true,
            AdminPostFilter::Pending => post.is_pending_approval(),
            AdminPostFilter::Status(JobPostStatus::Closed) => {
                post.status == JobPostStatus::Closed || !post.is_active
            }
            AdminPostFilter::Status(status) => post.status == *status && post.is_active,
        }
    }
}

impl FromStr for AdminPostFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(AdminPostFilter::All),
            "pending" => Ok(AdminPostFilter::Pending),
            other => other.parse().map(AdminPostFilter::Status),
        }
    }
}
