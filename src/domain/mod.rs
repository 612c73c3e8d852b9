//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! roles and sessions, accounts, profiles, the job post lifecycle,
//! the application workflow, employer feedback and admin reports.

pub mod application;
pub mod catalog;
pub mod feedback;
pub mod job_post;
pub mod password;
pub mod profile;
pub mod report;
pub mod role;
pub mod session;
pub mod user;
pub mod validation;

pub use application::{
    ApplicantSummary, Application, ApplicationStatus, ApplicationView, EmployerSummary,
    JobSummary, NewApplication, ResumeSource, StatusChange, StatusEntry,
};
pub use catalog::{CatalogEntry, City, JobCategory, JobType, NewCategory, NewJobType};
pub use feedback::{CandidateSummary, Feedback, FeedbackView, NewFeedback};
pub use job_post::{
    AdminPostFilter, ExperienceLevel, JobPost, JobPostChanges, JobPostFilter, JobPostStatus,
    NewJobPost, Salary, WorkArrangement,
};
pub use password::Password;
pub use profile::{
    Availability, CompanySize, Education, EmployerProfile, EmployerProfileChanges, Experience,
    JobSeekerProfile, JobSeekerProfileChanges, ProfessionalCard, ProfileSeed, ProfileVisibility,
    Project, Skill, SkillLevel, SocialLinks,
};
pub use report::{
    ApplicationReport, ApplicationReportFilter, ApplicationReportRow, ApplicationStats,
    DateRange, JobAnalytics, JobAnalyticsFilter, JobMetrics, JobTotals,
};
pub use role::{Access, Role};
pub use session::CurrentUser;
pub use user::{NewUser, User, UserResponse, UserStatus};
