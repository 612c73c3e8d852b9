//! Application workflow.
//!
//! `ApplicationStatus::allowed_next` is the transition table. Terminal states
//! admit nothing unless an admin passes the override flag, and every accepted
//! move appends exactly one `StatusEntry`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{CatalogEntry, JobPostStatus};
use crate::config::MAX_APPLICATION_NOTES_LENGTH;
use crate::errors::{AppError, AppResult, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ApplicationStatus {
    Applied,
    #[serde(rename = "Under Review")]
    UnderReview,
    Shortlisted,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    #[serde(rename = "Interview Completed")]
    InterviewCompleted,
    #[serde(rename = "Assessment Pending")]
    AssessmentPending,
    #[serde(rename = "Reference Check")]
    ReferenceCheck,
    #[serde(rename = "Offer Extended")]
    OfferExtended,
    #[serde(rename = "Offer Accepted")]
    OfferAccepted,
    #[serde(rename = "Offer Declined")]
    OfferDeclined,
    Rejected,
    Withdrawn,
}

use ApplicationStatus::*;

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 12] = [
        Applied,
        UnderReview,
        Shortlisted,
        InterviewScheduled,
        InterviewCompleted,
        AssessmentPending,
        ReferenceCheck,
        OfferExtended,
        OfferAccepted,
        OfferDeclined,
        Rejected,
        Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Applied => "Applied",
            UnderReview => "Under Review",
            Shortlisted => "Shortlisted",
            InterviewScheduled => "Interview Scheduled",
            InterviewCompleted => "Interview Completed",
            AssessmentPending => "Assessment Pending",
            ReferenceCheck => "Reference Check",
            OfferExtended => "Offer Extended",
            OfferAccepted => "Offer Accepted",
            OfferDeclined => "Offer Declined",
            Rejected => "Rejected",
            Withdrawn => "Withdrawn",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferAccepted | OfferDeclined | Rejected | Withdrawn)
    }

    pub fn allowed_next(&self) -> &'static [ApplicationStatus] {
        match self {
            Applied => &[UnderReview, Shortlisted, Rejected, Withdrawn],
            UnderReview => &[
                Shortlisted,
                InterviewScheduled,
                AssessmentPending,
                Rejected,
                Withdrawn,
            ],
            Shortlisted => &[InterviewScheduled, AssessmentPending, Rejected, Withdrawn],
            InterviewScheduled => &[InterviewCompleted, Rejected, Withdrawn],
            InterviewCompleted => &[
                InterviewScheduled,
                AssessmentPending,
                ReferenceCheck,
                OfferExtended,
                Rejected,
                Withdrawn,
            ],
            AssessmentPending => &[
                InterviewScheduled,
                ReferenceCheck,
                OfferExtended,
                Rejected,
                Withdrawn,
            ],
            ReferenceCheck => &[OfferExtended, Rejected, Withdrawn],
            OfferExtended => &[OfferAccepted, OfferDeclined, Rejected, Withdrawn],
            OfferAccepted | OfferDeclined | Rejected | Withdrawn => &[],
        }
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(AppError::validation("Status is required"));
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::validation(format!("Invalid application status '{}'", wanted)))
    }
}

/// One row of the append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: ApplicationStatus,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_seeker_id: Uuid,
    pub job_post_id: Uuid,
    pub resume_url: String,
    pub cover_letter_url: Option<String>,
    pub notes: Option<String>,
    pub status: ApplicationStatus,
    pub employer_notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Oldest first
    pub status_history: Vec<StatusEntry>,
}

impl Application {
    /// Check a move to `next`. `admin_override` lifts the terminal-state lock
    /// but never allows staying in place.
    pub fn check_transition(&self, next: ApplicationStatus, admin_override: bool) -> AppResult<()> {
        if self.status.can_transition_to(next) {
            return Ok(());
        }
        if admin_override && self.status.is_terminal() && next != self.status {
            return Ok(());
        }
        Err(AppError::InvalidTransition(Transition::Application(self.status, next)))
    }
}

/// Where the resume attached to a submission comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeSource {
    /// The resume already on the seeker's profile
    Profile,
    /// A file uploaded with the submission, already stored
    Uploaded(Option<String>),
}

impl ResumeSource {
    pub fn resolve(self, profile_resume: Option<&str>) -> AppResult<String> {
        match self {
            ResumeSource::Profile => profile_resume
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::validation("No resume found in your profile. Please upload a resume")
                }),
            ResumeSource::Uploaded(url) => {
                url.ok_or_else(|| AppError::validation("Resume file is required"))
            }
        }
    }
}

pub fn check_notes(notes: Option<&str>) -> AppResult<()> {
    match notes {
        Some(text) if text.chars().count() > MAX_APPLICATION_NOTES_LENGTH as usize => Err(
            AppError::validation(format!(
                "Notes cannot exceed {} characters",
                MAX_APPLICATION_NOTES_LENGTH
            )),
        ),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_seeker_id: Uuid,
    pub job_post_id: Uuid,
    pub resume_url: String,
    pub cover_letter_url: Option<String>,
    pub notes: Option<String>,
}

/// A status move to persist together with its history entry. `from` is the
/// status the move was checked against; the store refuses it once the row
/// has moved on.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub from: ApplicationStatus,
    pub status: ApplicationStatus,
    pub updated_by: Uuid,
    pub at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl StatusChange {
    pub fn entry(&self) -> StatusEntry {
        StatusEntry {
            status: self.status,
            updated_by: self.updated_by,
            updated_at: self.at,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployerSummary {
    pub id: Uuid,
    pub company_name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub status: JobPostStatus,
    pub deadline: DateTime<Utc>,
    pub employer: Option<EmployerSummary>,
    pub category: Option<CatalogEntry>,
    pub job_type: Option<CatalogEntry>,
    pub city: Option<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
}

/// Application joined with what list screens need.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobSummary>,
    pub applicant: Option<ApplicantSummary>,
}
