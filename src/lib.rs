//! SkillBridge - Job marketplace API
//!
//! Connects undergraduate job seekers with employers: accounts and
//! email verification, profiles, job posts with admin approval, and the
//! application workflow.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases
//! - **infra**: Infrastructure (database, Redis, uploads, email queue, recommender)
//! - **api**: HTTP handlers, middleware, and routes
//! - **jobs**: Background job payloads and handlers
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! skillbridge serve
//!
//! # Run migrations
//! skillbridge migrate up
//!
//! # Drain the email queue
//! skillbridge jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CurrentUser, Password, Role, User};
pub use errors::{AppError, AppResult};
