//! HTTP request handlers.

pub mod admin_handler;
pub mod application_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod employer_handler;
pub mod feedback_handler;
pub mod health_handler;
pub mod job_post_handler;
pub mod jobseeker_handler;
pub mod professional_handler;

pub use admin_handler::admin_routes;
pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::catalog_routes;
pub use employer_handler::employer_routes;
pub use health_handler::{health, root};
pub use job_post_handler::job_post_routes;
pub use jobseeker_handler::jobseeker_routes;
pub use professional_handler::professional_routes;
