//! Client for the external job recommendation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::RECOMMENDER_TIMEOUT_SECONDS;
use crate::domain::{JobPost, JobSeekerProfile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const SERVICE_NAME: &str = "recommendation";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendRequest<'a> {
    job_seeker: &'a JobSeekerProfile,
    jobs: &'a [JobPost],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendResponse {
    #[serde(default)]
    recommended_jobs: Vec<ScoredJob>,
}

/// One job as scored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    pub id: Uuid,
    pub similarity: f64,
    pub match_label: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Score `jobs` against the seeker profile, best match first
    async fn recommend(
        &self,
        job_seeker: JobSeekerProfile,
        jobs: Vec<JobPost>,
    ) -> AppResult<Vec<ScoredJob>>;
}

pub struct HttpRecommender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecommender {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RECOMMENDER_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}/recommend-jobs", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Recommender for HttpRecommender {
    async fn recommend(
        &self,
        job_seeker: JobSeekerProfile,
        jobs: Vec<JobPost>,
    ) -> AppResult<Vec<ScoredJob>> {
        let request = RecommendRequest {
            job_seeker: &job_seeker,
            jobs: &jobs,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                service: SERVICE_NAME,
                body: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Recommendation service returned an error");
            return Err(AppError::Upstream {
                service: SERVICE_NAME,
                body,
            });
        }

        let parsed: RecommendResponse = response.json().await.map_err(|e| AppError::Upstream {
            service: SERVICE_NAME,
            body: format!("Unreadable response: {}", e),
        })?;

        Ok(parsed.recommended_jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let id = Uuid::new_v4();
        let raw = format!(
            r#"{{"recommendedJobs":[{{"id":"{}","similarity":0.82,"matchLabel":"Excellent match"}}]}}"#,
            id
        );
        let parsed: RecommendResponse = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.recommended_jobs.len(), 1);
        assert_eq!(parsed.recommended_jobs[0].id, id);
        assert_eq!(parsed.recommended_jobs[0].match_label, "Excellent match");
        assert!(parsed.recommended_jobs[0].details.is_null());
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = HttpRecommender::new("http://ai:8000/").unwrap();
        assert_eq!(client.endpoint, "http://ai:8000/recommend-jobs");
    }
}
