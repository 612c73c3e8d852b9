//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories so services depend on one handle.
//! Multi-row writes that must be atomic (signup, submission, status change,
//! deletion) open their transaction inside the owning store.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    ApplicationRepository, ApplicationStore, CatalogRepository, CatalogStore, EmployerRepository,
    EmployerStore, FeedbackRepository, FeedbackStore, JobPostRepository, JobPostStore,
    JobSeekerRepository, JobSeekerStore, ReportRepository, ReportStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn job_seekers(&self) -> Arc<dyn JobSeekerRepository>;

    fn employers(&self) -> Arc<dyn EmployerRepository>;

    fn job_posts(&self) -> Arc<dyn JobPostRepository>;

    fn applications(&self) -> Arc<dyn ApplicationRepository>;

    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    fn feedback(&self) -> Arc<dyn FeedbackRepository>;

    /// Read-only aggregates for the admin reports
    fn reports(&self) -> Arc<dyn ReportRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    job_seekers: Arc<JobSeekerStore>,
    employers: Arc<EmployerStore>,
    job_posts: Arc<JobPostStore>,
    applications: Arc<ApplicationStore>,
    catalog: Arc<CatalogStore>,
    feedback: Arc<FeedbackStore>,
    reports: Arc<ReportStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            job_seekers: Arc::new(JobSeekerStore::new(db.clone())),
            employers: Arc::new(EmployerStore::new(db.clone())),
            job_posts: Arc::new(JobPostStore::new(db.clone())),
            applications: Arc::new(ApplicationStore::new(db.clone())),
            catalog: Arc::new(CatalogStore::new(db.clone())),
            feedback: Arc::new(FeedbackStore::new(db.clone())),
            reports: Arc::new(ReportStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
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
