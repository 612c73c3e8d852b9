//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{
    AdminService, ApplicationDesk, ApplicationService, AuthService, Authenticator, Catalog,
    CatalogService, FeedbackDesk, FeedbackService, JobBoard, JobPostService, Matchmaker,
    Moderator, ProfileManager, ProfileService, RecommendationService, TokenService,
};
use crate::config::Config;
use crate::infra::{FileStorage, Mailer, Recommender, UnitOfWork};
use crate::jobs::EmailComposer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Accounts, sessions and email tokens
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Job seeker and employer profiles
    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn job_posts(&self) -> Arc<dyn JobPostService>;

    fn applications(&self) -> Arc<dyn ApplicationService>;

    /// Moderation and the admin dashboard
    fn admin(&self) -> Arc<dyn AdminService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn recommendations(&self) -> Arc<dyn RecommendationService>;

    /// Employer feedback on candidates
    fn feedback(&self) -> Arc<dyn FeedbackService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    profile_service: Arc<dyn ProfileService>,
    job_post_service: Arc<dyn JobPostService>,
    application_service: Arc<dyn ApplicationService>,
    admin_service: Arc<dyn AdminService>,
    catalog_service: Arc<dyn CatalogService>,
    recommendation_service: Arc<dyn RecommendationService>,
    feedback_service: Arc<dyn FeedbackService>,
}

impl Services {
    /// Build every service over one unit of work and the shared adapters.
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        config: &Config,
        mailer: Arc<dyn Mailer>,
        storage: Arc<dyn FileStorage>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        let emails = EmailComposer::new(
            config.from_email.clone(),
            config.client_url.clone(),
            config.support_email.clone(),
        );

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                TokenService::new(config),
                mailer.clone(),
                emails.clone(),
            )),
            profile_service: Arc::new(ProfileManager::new(uow.clone(), storage.clone())),
            job_post_service: Arc::new(JobBoard::new(uow.clone())),
            application_service: Arc::new(ApplicationDesk::new(uow.clone(), storage)),
            admin_service: Arc::new(Moderator::new(uow.clone(), mailer, emails)),
            catalog_service: Arc::new(Catalog::new(uow.clone())),
            feedback_service: Arc::new(FeedbackDesk::new(uow.clone())),
            recommendation_service: Arc::new(Matchmaker::new(uow, recommender)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn job_posts(&self) -> Arc<dyn JobPostService> {
        self.job_post_service.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.application_service.clone()
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        self.admin_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn recommendations(&self) -> Arc<dyn RecommendationService> {
        self.recommendation_service.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackService> {
        self.feedback_service.clone()
    }
}
