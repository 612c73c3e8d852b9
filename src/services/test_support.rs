//! Mock-backed Unit of Work and fixtures for service unit tests.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationStatus, Availability, EmployerProfile, JobSeekerProfile,
    ProfileVisibility, Role, SocialLinks, User, UserStatus,
};
use crate::infra::{
    ApplicationRepository, CatalogRepository, EmployerRepository, FeedbackRepository,
    JobPostRepository, JobSeekerRepository, MockApplicationRepository, MockCatalogRepository,
    MockEmployerRepository, MockFeedbackRepository, MockJobPostRepository,
    MockJobSeekerRepository, MockReportRepository, MockUserRepository, ReportRepository,
    UnitOfWork, UserRepository,
};

/// Each repository is a mock with no expectations unless replaced.
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    job_seekers: Arc<MockJobSeekerRepository>,
    employers: Arc<MockEmployerRepository>,
    job_posts: Arc<MockJobPostRepository>,
    applications: Arc<MockApplicationRepository>,
    catalog: Arc<MockCatalogRepository>,
    feedback: Arc<MockFeedbackRepository>,
    reports: Arc<MockReportRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            job_seekers: Arc::new(MockJobSeekerRepository::new()),
            employers: Arc::new(MockEmployerRepository::new()),
            job_posts: Arc::new(MockJobPostRepository::new()),
            applications: Arc::new(MockApplicationRepository::new()),
            catalog: Arc::new(MockCatalogRepository::new()),
            feedback: Arc::new(MockFeedbackRepository::new()),
            reports: Arc::new(MockReportRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_users(mut self, repo: MockUserRepository) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_job_seekers(mut self, repo: MockJobSeekerRepository) -> Self {
        self.job_seekers = Arc::new(repo);
        self
    }

    pub fn with_employers(mut self, repo: MockEmployerRepository) -> Self {
        self.employers = Arc::new(repo);
        self
    }

    pub fn with_job_posts(mut self, repo: MockJobPostRepository) -> Self {
        self.job_posts = Arc::new(repo);
        self
    }

    pub fn with_applications(mut self, repo: MockApplicationRepository) -> Self {
        self.applications = Arc::new(repo);
        self
    }

    pub fn with_catalog(mut self, repo: MockCatalogRepository) -> Self {
        self.catalog = Arc::new(repo);
        self
    }

    pub fn with_feedback(mut self, repo: MockFeedbackRepository) -> Self {
        self.feedback = Arc::new(repo);
        self
    }

    pub fn with_reports(mut self, repo: MockReportRepository) -> Self {
        self.reports = Arc::new(repo);
        self
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn job_seekers(&self) -> Arc<dyn JobSeekerRepository> {
        self.job_seekers.clone()
    }

    fn employers(&self) -> Arc<dyn EmployerRepository> {
        self.employers.clone()
    }

    fn job_posts(&self) -> Arc<dyn JobPostRepository> {
        self.job_posts.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.applications.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.feedback.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.reports.clone()
    }
}

pub(crate) fn user(role: Role, status: UserStatus) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "someone@uom.ac.lk".to_string(),
        password_hash: "hashed".to_string(),
        first_name: "Nimal".to_string(),
        last_name: "Perera".to_string(),
        role,
        status,
        email_verified: true,
        email_verification_token: None,
        email_verification_expires: None,
        password_reset_token: None,
        password_reset_expires: None,
        login_attempts: 0,
        lock_until: None,
        last_login: None,
        created_at: now - Duration::days(3),
        updated_at: now,
    }
}

pub(crate) fn seeker_profile(user_id: Uuid) -> JobSeekerProfile {
    let now = Utc::now();
    JobSeekerProfile {
        id: Uuid::new_v4(),
        user_id,
        statement_header: None,
        statement: None,
        university: Some("University of Moratuwa".to_string()),
        field_of_study: None,
        resume_url: None,
        profile_picture_url: None,
        city_id: None,
        availability: Availability::Immediately,
        profile_visibility: ProfileVisibility::Public,
        skills: Vec::new(),
        educations: Vec::new(),
        experiences: Vec::new(),
        projects: Vec::new(),
        social_links: SocialLinks::default(),
        profile_completeness: 10,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn employer_profile(user_id: Uuid) -> EmployerProfile {
    let now = Utc::now();
    EmployerProfile {
        id: Uuid::new_v4(),
        user_id,
        company_name: "Acme Labs".to_string(),
        business_email: "hr@acme.lk".to_string(),
        contact_person_name: "Kamal Silva".to_string(),
        website: None,
        description: None,
        logo_url: None,
        industry: None,
        company_size: None,
        founded_year: None,
        headquarters: None,
        phone: None,
        address: None,
        city_id: None,
        social_links: SocialLinks::default(),
        verified: false,
        profile_completeness: 23,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn application(
    job_seeker_id: Uuid,
    job_post_id: Uuid,
    status: ApplicationStatus,
) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        job_seeker_id,
        job_post_id,
        resume_url: "/uploads/cvs/cv-1.pdf".to_string(),
        cover_letter_url: None,
        notes: None,
        status,
        employer_notes: None,
        applied_at: now,
        updated_at: now,
        status_history: Vec::new(),
    }
}
