//! Employer feedback on candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{CurrentUser, EmployerSummary, Role};
use crate::config::MAX_FEEDBACK_LENGTH;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub job_seeker_id: Uuid,
    pub job_title: String,
    /// 1 to 5
    pub rating: i32,
    pub feedback: String,
    pub skills: Vec<String>,
    pub would_recommend: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an employer writes about a candidate.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub job_seeker_id: Uuid,
    #[validate(length(min = 1, max = 150, message = "Job title is required"))]
    #[schema(example = "Junior Backend Engineer")]
    pub job_title: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, max = MAX_FEEDBACK_LENGTH, message = "Feedback must be 1-1000 characters"))]
    pub feedback: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub would_recommend: bool,
    #[serde(default)]
    pub is_public: bool,
}

impl NewFeedback {
    /// Trimmed text and skills, blanks and repeats dropped.
    pub fn normalized(self) -> Self {
        let mut skills: Vec<String> = Vec::with_capacity(self.skills.len());
        for skill in self.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !skills.iter().any(|kept| kept.eq_ignore_ascii_case(skill)) {
                skills.push(skill.to_string());
            }
        }
        Self {
            job_title: self.job_title.trim().to_string(),
            feedback: self.feedback.trim().to_string(),
            skills,
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
}

/// Feedback joined with both parties.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub employer: Option<EmployerSummary>,
    pub job_seeker: Option<CandidateSummary>,
}

impl Feedback {
    /// The author employer, the candidate it is about, and admins.
    /// `profile_id` is the viewer's employer or seeker profile id.
    pub fn visible_to(&self, viewer: &CurrentUser, profile_id: Option<Uuid>) -> bool {
        match viewer.role {
            Role::Admin => true,
            Role::Employer => profile_id == Some(self.employer_id),
            Role::JobSeeker => profile_id == Some(self.job_seeker_id),
        }
    }
}
