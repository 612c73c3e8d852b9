//! Job recommendations for signed-in job seekers.
//!
//! The visible board is scored by the external recommendation service and
//! the scores are joined back onto the posts in the order returned.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::MAX_RECOMMENDATION_CANDIDATES;
use crate::domain::{CurrentUser, JobPost, JobPostFilter};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{Recommender, UnitOfWork};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub job: JobPost,
    pub similarity: f64,
    pub match_label: String,
    pub details: serde_json::Value,
}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, actor: &CurrentUser) -> AppResult<Vec<Recommendation>>;
}

pub struct Matchmaker<U: UnitOfWork> {
    uow: Arc<U>,
    recommender: Arc<dyn Recommender>,
}

impl<U: UnitOfWork> Matchmaker<U> {
    pub fn new(uow: Arc<U>, recommender: Arc<dyn Recommender>) -> Self {
        Self { uow, recommender }
    }
}

#[async_trait]
impl<U: UnitOfWork> RecommendationService for Matchmaker<U> {
    async fn recommend(&self, actor: &CurrentUser) -> AppResult<Vec<Recommendation>> {
        let profile = self
            .uow
            .job_seekers()
            .find_by_user(actor.id)
            .await?
            .ok_or_not_found("Job seeker profile")?;

        let (posts, _) = self
            .uow
            .job_posts()
            .list_public(
                JobPostFilter::default(),
                Utc::now(),
                0,
                MAX_RECOMMENDATION_CANDIDATES,
            )
            .await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let scored = self.recommender.recommend(profile, posts.clone()).await?;
        let mut by_id: HashMap<_, _> = posts.into_iter().map(|p| (p.id, p)).collect();

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .filter_map(|score| {
                by_id.remove(&score.id).map(|job| Recommendation {
                    job,
                    similarity: score.similarity,
                    match_label: score.match_label,
                    details: score.details,
                })
            })
            .collect();

        tracing::debug!(
            user_id = %actor.id,
            count = recommendations.len(),
            "Recommendations computed"
        );
        Ok(recommendations)
    }
}
