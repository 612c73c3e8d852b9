//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! One trait per aggregate; the `*Store` types are the SeaORM implementations.

mod application_repository;
mod catalog_repository;
pub(crate) mod entities;
mod feedback_repository;
mod job_post_repository;
mod profile_repository;
mod report_repository;
mod user_repository;

use sea_orm::{DbErr, SqlErr};

pub use application_repository::{ApplicationRepository, ApplicationStore};
pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore};
pub use job_post_repository::{JobPostRepository, JobPostStore};
pub use profile_repository::{
    EmployerRepository, EmployerStore, JobSeekerRepository, JobSeekerStore,
};
pub use report_repository::{ReportRepository, ReportStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use application_repository::MockApplicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_post_repository::MockJobPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::{MockEmployerRepository, MockJobSeekerRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

const UNIQUE_VIOLATION_MESSAGE: &str = "duplicate key value violates unique constraint";

/// A unique index rejected the write. Falls back to the Postgres message for
/// errors that reach us without a driver error attached.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains(UNIQUE_VIOLATION_MESSAGE)
}
