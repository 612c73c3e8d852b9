//! Feedback repository. Views join the author company and the candidate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{employer, feedback, job_seeker, to_json, user};
use crate::domain::{CandidateSummary, EmployerSummary, Feedback, FeedbackView, NewFeedback};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, employer_id: Uuid, feedback: NewFeedback) -> AppResult<Feedback>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedbackView>>;

    /// Written by the employer, newest first
    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<FeedbackView>>;

    /// About the seeker, newest first
    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<FeedbackView>>;
}

pub struct FeedbackStore {
    db: DatabaseConnection,
}

impl FeedbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn list(&self, condition: Condition) -> AppResult<Vec<FeedbackView>> {
        let models = feedback::Entity::find()
            .filter(condition)
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.assemble(models).await
    }

    async fn assemble(&self, models: Vec<feedback::Model>) -> AppResult<Vec<FeedbackView>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let employers: HashMap<Uuid, EmployerSummary> = employer::Entity::find()
            .filter(employer::Column::Id.is_in(models.iter().map(|m| m.employer_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| {
                let summary = EmployerSummary {
                    id: e.id,
                    company_name: e.company_name,
                    logo_url: e.logo_url,
                };
                (summary.id, summary)
            })
            .collect();

        let seekers: HashMap<Uuid, job_seeker::Model> = job_seeker::Entity::find()
            .filter(job_seeker::Column::Id.is_in(models.iter().map(|m| m.job_seeker_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let users: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(seekers.values().map(|s| s.user_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(models
            .into_iter()
            .map(|model| {
                let job_seeker = seekers.get(&model.job_seeker_id).and_then(|seeker| {
                    users.get(&seeker.user_id).map(|u| CandidateSummary {
                        id: seeker.id,
                        first_name: u.first_name.clone(),
                        last_name: u.last_name.clone(),
                        email: u.email.clone(),
                        profile_picture_url: seeker.profile_picture_url.clone(),
                    })
                });
                FeedbackView {
                    employer: employers.get(&model.employer_id).cloned(),
                    job_seeker,
                    feedback: Feedback::from(model),
                }
            })
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn create(&self, employer_id: Uuid, new: NewFeedback) -> AppResult<Feedback> {
        let now = Utc::now();
        let model = feedback::ActiveModel {
            id: Set(Uuid::new_v4()),
            employer_id: Set(employer_id),
            job_seeker_id: Set(new.job_seeker_id),
            job_title: Set(new.job_title),
            rating: Set(new.rating),
            feedback: Set(new.feedback),
            skills: Set(to_json(&new.skills)),
            would_recommend: Set(new.would_recommend),
            is_public: Set(new.is_public),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(Feedback::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedbackView>> {
        let Some(model) = feedback::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.assemble(vec![model]).await?.pop())
    }

    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<FeedbackView>> {
        self.list(Condition::all().add(feedback::Column::EmployerId.eq(employer_id)))
            .await
    }

    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<FeedbackView>> {
        self.list(Condition::all().add(feedback::Column::JobSeekerId.eq(job_seeker_id)))
            .await
    }
}
