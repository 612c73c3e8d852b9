//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work for repository access.

mod admin_service;
mod application_service;
mod auth_service;
mod catalog_service;
pub mod container;
mod feedback_service;
mod job_post_service;
mod profile_service;
mod recommendation_service;
mod token_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use admin_service::{AdminOverview, AdminService, Moderator, UserStatusUpdate};
pub use application_service::{ApplicationDesk, ApplicationService, StatusUpdate, Submission};
pub use auth_service::{
    AdminSignup, AuthService, Authenticator, EmployerSignup, JobSeekerSignup, SignIn,
};
pub use catalog_service::{Catalog, CatalogService};
pub use feedback_service::{FeedbackDesk, FeedbackService};
pub use job_post_service::{JobBoard, JobPostService};
pub use profile_service::{ProfileManager, ProfileService};
pub use recommendation_service::{Matchmaker, Recommendation, RecommendationService};
pub use token_service::{Claims, TokenResponse, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
