//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::{HealthCheck, RateLimiter};
use crate::services::ServiceContainer;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// All application services
    pub services: Arc<dyn ServiceContainer>,
    /// Request counters for the rate limiting middleware
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Checks reported by `GET /health`
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        rate_limiter: Arc<dyn RateLimiter>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            services,
            rate_limiter,
            health_checks,
        }
    }
}
