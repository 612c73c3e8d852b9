//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Redis-backed rate limiting
//! - Local upload storage
//! - The email queue and the recommendation service client
//! - Unit of Work as the single repository handle

pub mod cache;
pub mod db;
pub mod health;
pub mod mailer;
pub mod recommender;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::{Cache, RateLimiter};
pub use db::{Database, Migrator};
pub use health::HealthCheck;
pub use mailer::{LogMailer, Mailer, QueuedMailer};
pub use recommender::{HttpRecommender, Recommender, ScoredJob};
pub use repositories::{
    ApplicationRepository, CatalogRepository, EmployerRepository, FeedbackRepository,
    JobPostRepository, JobSeekerRepository, ReportRepository, UserRepository,
};
pub use storage::{FileStorage, LocalFileStorage, UploadKind, UploadedFile};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use recommender::MockRecommender;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockApplicationRepository, MockCatalogRepository, MockEmployerRepository,
    MockFeedbackRepository, MockJobPostRepository, MockJobSeekerRepository,
    MockReportRepository, MockUserRepository,
};
