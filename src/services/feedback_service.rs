//! Employer feedback on candidates.
//!
//! Employers write feedback about any job seeker; each side lists what it
//! wrote or received. A feedback the caller may not see is reported as
//! missing.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CurrentUser, Feedback, FeedbackView, NewFeedback, Role};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Written by the signed-in employer
    async fn create(&self, actor: &CurrentUser, feedback: NewFeedback) -> AppResult<Feedback>;

    /// Feedback the employer wrote or the seeker received, newest first
    async fn list(&self, actor: &CurrentUser) -> AppResult<Vec<FeedbackView>>;

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<FeedbackView>;
}

pub struct FeedbackDesk<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FeedbackDesk<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn company_id(&self, actor: &CurrentUser) -> AppResult<Uuid> {
        self.uow
            .employers()
            .find_by_user(actor.id)
            .await?
            .map(|company| company.id)
            .ok_or_not_found("Employer profile")
    }

    async fn seeker_id(&self, actor: &CurrentUser) -> AppResult<Uuid> {
        self.uow
            .job_seekers()
            .find_by_user(actor.id)
            .await?
            .map(|profile| profile.id)
            .ok_or_not_found("Job seeker profile")
    }

    /// The viewer's own profile id, if the role has one.
    async fn profile_id(&self, actor: &CurrentUser) -> AppResult<Option<Uuid>> {
        match actor.role {
            Role::Employer => self.company_id(actor).await.map(Some),
            Role::JobSeeker => self.seeker_id(actor).await.map(Some),
            Role::Admin => Ok(None),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> FeedbackService for FeedbackDesk<U> {
    async fn create(&self, actor: &CurrentUser, feedback: NewFeedback) -> AppResult<Feedback> {
        let employer_id = self.company_id(actor).await?;
        let feedback = feedback.normalized();
        self.uow
            .job_seekers()
            .find_by_id(feedback.job_seeker_id)
            .await?
            .ok_or_not_found("Job seeker")?;

        let created = self.uow.feedback().create(employer_id, feedback).await?;
        tracing::info!(
            feedback_id = %created.id,
            employer_id = %employer_id,
            job_seeker_id = %created.job_seeker_id,
            rating = created.rating,
            "Candidate feedback added"
        );
        Ok(created)
    }

    async fn list(&self, actor: &CurrentUser) -> AppResult<Vec<FeedbackView>> {
        match actor.role {
            Role::Employer => {
                let employer_id = self.company_id(actor).await?;
                self.uow.feedback().list_for_employer(employer_id).await
            }
            Role::JobSeeker => {
                let seeker_id = self.seeker_id(actor).await?;
                self.uow.feedback().list_for_seeker(seeker_id).await
            }
            Role::Admin => Err(AppError::Forbidden),
        }
    }

    async fn get(&self, actor: &CurrentUser, id: Uuid) -> AppResult<FeedbackView> {
        let view = self
            .uow
            .feedback()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Feedback")?;
        let profile_id = self.profile_id(actor).await?;
        if view.feedback.visible_to(actor, profile_id) {
            Ok(view)
        } else {
            Err(AppError::not_found("Feedback"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::infra::{MockEmployerRepository, MockFeedbackRepository, MockJobSeekerRepository};
    use crate::services::test_support::{employer_profile, seeker_profile, TestUnitOfWork};

    fn actor(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@acme.lk".into(),
            role,
        }
    }

    fn new_feedback(job_seeker_id: Uuid) -> NewFeedback {
        NewFeedback {
            job_seeker_id,
            job_title: " Backend Intern ".into(),
            rating: 4,
            feedback: "Delivered the API on time".into(),
            skills: vec!["Rust".into(), " rust ".into()],
            would_recommend: true,
            is_public: false,
        }
    }

    fn view(employer_id: Uuid, job_seeker_id: Uuid) -> FeedbackView {
        let now = Utc::now();
        FeedbackView {
            feedback: Feedback {
                id: Uuid::new_v4(),
                employer_id,
                job_seeker_id,
                job_title: "Backend Intern".into(),
                rating: 4,
                feedback: "Delivered the API on time".into(),
                skills: vec![],
                would_recommend: true,
                is_public: false,
                created_at: now,
                updated_at: now,
            },
            employer: None,
            job_seeker: None,
        }
    }

    fn employers_with(company_id: Uuid) -> MockEmployerRepository {
        let mut employers = MockEmployerRepository::new();
        employers.expect_find_by_user().returning(move |user_id| {
            let mut company = employer_profile(user_id);
            company.id = company_id;
            Ok(Some(company))
        });
        employers
    }

    #[tokio::test]
    async fn test_create_is_normalized_and_owned_by_the_company() {
        let company_id = Uuid::new_v4();
        let seeker = seeker_profile(Uuid::new_v4());
        let seeker_id = seeker.id;

        let mut seekers = MockJobSeekerRepository::new();
        seekers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(seeker.clone())));
        let mut feedback = MockFeedbackRepository::new();
        feedback
            .expect_create()
            .withf(move |employer_id, new| {
                *employer_id == company_id
                    && new.job_title == "Backend Intern"
                    && new.skills == vec!["Rust".to_string()]
            })
            .times(1)
            .returning(move |employer_id, new| {
                let mut created = view(employer_id, new.job_seeker_id).feedback;
                created.skills = new.skills;
                Ok(created)
            });

        let uow = TestUnitOfWork::default()
            .with_employers(employers_with(company_id))
            .with_job_seekers(seekers)
            .with_feedback(feedback);
        let created = tokio_test::assert_ok!(
            FeedbackDesk::new(Arc::new(uow))
                .create(&actor(Role::Employer), new_feedback(seeker_id))
                .await
        );
        assert_eq!(created.employer_id, company_id);
    }

    #[tokio::test]
    async fn test_feedback_on_unknown_seeker_is_not_found() {
        let mut seekers = MockJobSeekerRepository::new();
        seekers.expect_find_by_id().returning(|_| Ok(None));
        let mut feedback = MockFeedbackRepository::new();
        feedback.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_employers(employers_with(Uuid::new_v4()))
            .with_job_seekers(seekers)
            .with_feedback(feedback);
        let result = FeedbackDesk::new(Arc::new(uow))
            .create(&actor(Role::Employer), new_feedback(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_other_seeker_cannot_read_feedback() {
        let stored = view(Uuid::new_v4(), Uuid::new_v4());
        let id = stored.feedback.id;

        let mut feedback = MockFeedbackRepository::new();
        feedback
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let mut seekers = MockJobSeekerRepository::new();
        seekers
            .expect_find_by_user()
            .returning(|user_id| Ok(Some(seeker_profile(user_id))));

        let uow = TestUnitOfWork::default()
            .with_feedback(feedback)
            .with_job_seekers(seekers);
        let result = FeedbackDesk::new(Arc::new(uow))
            .get(&actor(Role::JobSeeker), id)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_subject_seeker_reads_and_lists_feedback() {
        let user_id = Uuid::new_v4();
        let profile = seeker_profile(user_id);
        let seeker_id = profile.id;
        let stored = view(Uuid::new_v4(), seeker_id);
        let id = stored.feedback.id;

        let mut seekers = MockJobSeekerRepository::new();
        seekers
            .expect_find_by_user()
            .returning(move |_| Ok(Some(profile.clone())));
        let mut feedback = MockFeedbackRepository::new();
        let found = stored.clone();
        feedback
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        feedback
            .expect_list_for_seeker()
            .withf(move |id| *id == seeker_id)
            .returning(move |_| Ok(vec![stored.clone()]));

        let desk = FeedbackDesk::new(Arc::new(
            TestUnitOfWork::default()
                .with_job_seekers(seekers)
                .with_feedback(feedback),
        ));
        let seeker = CurrentUser {
            id: user_id,
            ..actor(Role::JobSeeker)
        };
        assert_eq!(tokio_test::assert_ok!(desk.get(&seeker, id).await).feedback.id, id);
        assert_eq!(tokio_test::assert_ok!(desk.list(&seeker).await).len(), 1);
    }
}
