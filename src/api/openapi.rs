//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, application_handler, auth_handler, catalog_handler, employer_handler,
    feedback_handler, health_handler, job_post_handler, jobseeker_handler, professional_handler,
};
use crate::domain::{
    ApplicantSummary, Application, ApplicationReport, ApplicationReportRow, ApplicationStats,
    ApplicationStatus, ApplicationView, Availability, CandidateSummary, CatalogEntry, City,
    CompanySize, Education, EmployerProfile, EmployerProfileChanges, EmployerSummary,
    Experience, ExperienceLevel, Feedback, FeedbackView, JobAnalytics, JobCategory, JobMetrics,
    JobPost, JobPostChanges, JobPostStatus, JobSeekerProfile, JobSeekerProfileChanges,
    JobSummary, JobTotals, JobType, NewCategory, NewFeedback, NewJobPost, NewJobType,
    ProfessionalCard, ProfileVisibility, Project, Role, Salary, Skill, SkillLevel, SocialLinks,
    StatusEntry, UserResponse, UserStatus, WorkArrangement,
};
use crate::infra::ScoredJob;
use crate::services::{
    AdminOverview, AdminSignup, EmployerSignup, JobSeekerSignup, Recommendation, SignIn,
    StatusUpdate, TokenResponse, UserStatusUpdate,
};

/// OpenAPI documentation for the SkillBridge API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SkillBridge API",
        version = "0.1.0",
        description = "Job marketplace connecting undergraduate job seekers with employers",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "SkillBridge Support", email = "support@skillbridge.lk")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        // Authentication
        auth_handler::signup_job_seeker,
        auth_handler::signup_employer,
        auth_handler::signin,
        auth_handler::signout,
        auth_handler::me,
        auth_handler::verify_email,
        auth_handler::resend_verification,
        auth_handler::forgot_password,
        auth_handler::reset_password,
        // Job seekers
        jobseeker_handler::get_profile,
        jobseeker_handler::update_profile,
        jobseeker_handler::upload_picture,
        jobseeker_handler::upload_resume,
        jobseeker_handler::remove_resume,
        jobseeker_handler::list_applications,
        jobseeker_handler::recommendations,
        // Employers
        employer_handler::get_profile,
        employer_handler::update_profile,
        employer_handler::upload_logo,
        employer_handler::list_job_posts,
        employer_handler::list_applications,
        // Feedback
        feedback_handler::create_feedback,
        feedback_handler::list_written,
        feedback_handler::get_written,
        feedback_handler::list_received,
        feedback_handler::get_received,
        // Directory
        professional_handler::list_professionals,
        // Job posts
        job_post_handler::list_job_posts,
        job_post_handler::get_job_post,
        job_post_handler::create_job_post,
        job_post_handler::update_job_post,
        job_post_handler::delete_job_post,
        job_post_handler::pause_job_post,
        job_post_handler::resume_job_post,
        job_post_handler::close_job_post,
        // Applications
        application_handler::submit_application,
        application_handler::get_application,
        application_handler::update_application_status,
        application_handler::withdraw_application,
        application_handler::delete_application,
        // Catalog
        catalog_handler::list_categories,
        catalog_handler::list_job_types,
        catalog_handler::list_cities,
        catalog_handler::create_category,
        catalog_handler::create_job_type,
        catalog_handler::get_category,
        catalog_handler::update_category,
        catalog_handler::delete_category,
        // Admin
        admin_handler::overview,
        admin_handler::list_users,
        admin_handler::create_admin,
        admin_handler::update_user_status,
        admin_handler::reset_user_password,
        admin_handler::list_job_posts,
        admin_handler::job_post_detail,
        admin_handler::approve_job_post,
        admin_handler::delete_job_post,
        admin_handler::update_admin_email,
        admin_handler::update_admin_password,
        admin_handler::job_report,
        admin_handler::application_report,
    ),
    components(
        schemas(
            // Accounts
            Role,
            UserStatus,
            UserResponse,
            TokenResponse,
            SignIn,
            JobSeekerSignup,
            EmployerSignup,
            AdminSignup,
            auth_handler::SignInRequest,
            auth_handler::VerifyEmailRequest,
            auth_handler::EmailRequest,
            auth_handler::ResetPasswordRequest,
            // Profiles
            JobSeekerProfile,
            JobSeekerProfileChanges,
            EmployerProfile,
            EmployerProfileChanges,
            Availability,
            ProfileVisibility,
            Skill,
            SkillLevel,
            Education,
            Experience,
            Project,
            SocialLinks,
            CompanySize,
            ProfessionalCard,
            // Feedback
            Feedback,
            NewFeedback,
            FeedbackView,
            CandidateSummary,
            // Job posts
            JobPost,
            NewJobPost,
            JobPostChanges,
            JobPostStatus,
            ExperienceLevel,
            WorkArrangement,
            Salary,
            Recommendation,
            ScoredJob,
            // Applications
            Application,
            ApplicationStatus,
            ApplicationView,
            ApplicantSummary,
            EmployerSummary,
            JobSummary,
            StatusEntry,
            StatusUpdate,
            // Catalog
            JobCategory,
            JobType,
            City,
            CatalogEntry,
            NewCategory,
            NewJobType,
            // Admin
            AdminOverview,
            UserStatusUpdate,
            admin_handler::AdminPasswordReset,
            admin_handler::AdminEmailChange,
            admin_handler::AdminPasswordChange,
            JobAnalytics,
            JobMetrics,
            JobTotals,
            ApplicationReport,
            ApplicationReportRow,
            ApplicationStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and dependency status"),
        (name = "Authentication", description = "Signup, sign-in, email verification and password reset"),
        (name = "Job Seekers", description = "Job seeker profile, resume and recommendations"),
        (name = "Employers", description = "Company profile and hiring dashboard"),
        (name = "Job Posts", description = "Public board and the employer post lifecycle"),
        (name = "Applications", description = "Submitting and reviewing applications"),
        (name = "Feedback", description = "Employer feedback on candidates"),
        (name = "Professionals", description = "Public job seeker directory"),
        (name = "Catalog", description = "Categories, job types and cities"),
        (name = "Admin", description = "Moderation, approvals and reports")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/signin"))
                        .build(),
                ),
            );
        }
    }
}
