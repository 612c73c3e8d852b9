//! In-memory adapters and fixtures shared by the integration tests.
//!
//! `MemoryStore` implements every repository trait over one set of tables
//! behind a mutex, so services and the router can be exercised end to end
//! without Postgres, Redis or the recommendation service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use skillbridge::api::{create_router, AppState};
use skillbridge::config::{Config, MAX_LOGIN_ATTEMPTS, UPLOAD_URL_PREFIX};
use skillbridge::domain::{
    AdminPostFilter, ApplicantSummary, Application, ApplicationReport, ApplicationReportFilter,
    ApplicationReportRow, ApplicationStats, ApplicationStatus, ApplicationView, Availability,
    CandidateSummary, CatalogEntry, City, CurrentUser, EmployerProfile, EmployerSummary,
    ExperienceLevel, Feedback, FeedbackView, JobAnalyticsFilter, JobCategory, JobMetrics,
    JobPost, JobPostFilter, JobPostStatus, JobSeekerProfile, JobSummary, JobType,
    NewApplication, NewCategory, NewFeedback, NewJobPost, NewJobType, NewUser, Password,
    ProfessionalCard, ProfileSeed, ProfileVisibility, Role, Salary, SocialLinks, StatusChange,
    User, UserStatus, WorkArrangement,
};
use skillbridge::errors::{AppError, AppResult, Transition};
use skillbridge::infra::{
    ApplicationRepository, CatalogRepository, EmployerRepository, FeedbackRepository,
    FileStorage, HealthCheck, JobPostRepository, JobSeekerRepository, RateLimiter, Recommender,
    ReportRepository, ScoredJob, UnitOfWork, UploadKind, UploadedFile, UserRepository,
};
use skillbridge::jobs::EmailJob;
use skillbridge::services::{ServiceContainer, Services, TokenService};

pub const TEST_SECRET: &str = "integration-test-secret-with-32-chars";
pub const STRONG_PASSWORD: &str = "Str0ng!Pass";

pub fn config() -> Config {
    Config::for_secret(TEST_SECRET)
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    job_seekers: Vec<JobSeekerProfile>,
    employers: Vec<EmployerProfile>,
    job_posts: Vec<JobPost>,
    applications: Vec<Application>,
    categories: Vec<JobCategory>,
    job_types: Vec<JobType>,
    cities: Vec<City>,
    feedback: Vec<Feedback>,
}

/// Every repository over shared in-memory tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    fn update_user(&self, id: Uuid, f: impl FnOnce(&mut User)) -> AppResult<User> {
        self.with(|t| {
            let user = t
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| AppError::not_found("User"))?;
            f(user);
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }

    fn update_post(&self, id: Uuid, f: impl FnOnce(&mut JobPost)) -> AppResult<JobPost> {
        self.with(|t| {
            let post = t
                .job_posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::not_found("Job post"))?;
            f(post);
            Ok(post.clone())
        })
    }

    /// Stored user by email, for reading tokens the mailer would have sent.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.with(|t| t.users.iter().find(|u| u.email == email).cloned())
    }

    pub fn post(&self, id: Uuid) -> Option<JobPost> {
        self.with(|t| t.job_posts.iter().find(|p| p.id == id).cloned())
    }

    /// Move a post's deadline, bypassing the future-deadline check on create.
    pub fn set_deadline(&self, id: Uuid, deadline: DateTime<Utc>) {
        self.with(|t| {
            if let Some(post) = t.job_posts.iter_mut().find(|p| p.id == id) {
                post.deadline = deadline;
            }
        });
    }

    /// Make a seeker's profile public or private.
    pub fn set_visibility(&self, user_id: Uuid, visibility: ProfileVisibility) {
        self.with(|t| {
            if let Some(profile) = t.job_seekers.iter_mut().find(|p| p.user_id == user_id) {
                profile.profile_visibility = visibility;
            }
        });
    }

    pub fn seeker_id(&self, user_id: Uuid) -> Option<Uuid> {
        self.with(|t| t.job_seekers.iter().find(|p| p.user_id == user_id).map(|p| p.id))
    }

    pub fn add_city(&self, name: &str) -> City {
        let city = City {
            id: Uuid::new_v4(),
            name: name.to_string(),
            country: "Sri Lanka".to_string(),
        };
        self.with(|t| t.cities.push(city.clone()));
        city
    }

    fn view(t: &Tables, application: &Application) -> ApplicationView {
        let job = t
            .job_posts
            .iter()
            .find(|p| p.id == application.job_post_id)
            .map(|post| JobSummary {
                id: post.id,
                title: post.title.clone(),
                status: post.status,
                deadline: post.deadline,
                employer: t
                    .employers
                    .iter()
                    .find(|e| e.id == post.employer_id)
                    .map(|e| EmployerSummary {
                        id: e.id,
                        company_name: e.company_name.clone(),
                        logo_url: e.logo_url.clone(),
                    }),
                category: None,
                job_type: None,
                city: None,
            });
        let applicant = t
            .job_seekers
            .iter()
            .find(|s| s.id == application.job_seeker_id)
            .and_then(|profile| {
                t.users.iter().find(|u| u.id == profile.user_id).map(|user| ApplicantSummary {
                    id: profile.id,
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    university: profile.university.clone(),
                    field_of_study: profile.field_of_study.clone(),
                })
            });
        ApplicationView {
            application: application.clone(),
            job,
            applicant,
        }
    }
}

fn feedback_view(t: &Tables, feedback: &Feedback) -> FeedbackView {
    let employer = t
        .employers
        .iter()
        .find(|e| e.id == feedback.employer_id)
        .map(|e| EmployerSummary {
            id: e.id,
            company_name: e.company_name.clone(),
            logo_url: e.logo_url.clone(),
        });
    let job_seeker = t
        .job_seekers
        .iter()
        .find(|s| s.id == feedback.job_seeker_id)
        .and_then(|profile| {
            t.users.iter().find(|u| u.id == profile.user_id).map(|user| CandidateSummary {
                id: profile.id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                profile_picture_url: profile.profile_picture_url.clone(),
            })
        });
    FeedbackView {
        feedback: feedback.clone(),
        employer,
        job_seeker,
    }
}

fn page<T: Clone>(items: &[T], offset: u64, limit: u64) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

fn seeker_profile(user_id: Uuid, university: String, field_of_study: Option<String>) -> JobSeekerProfile {
    let now = Utc::now();
    let mut profile = JobSeekerProfile {
        id: Uuid::new_v4(),
        user_id,
        statement_header: None,
        statement: None,
        university: Some(university),
        field_of_study,
        resume_url: None,
        profile_picture_url: None,
        city_id: None,
        availability: Availability::default(),
        profile_visibility: ProfileVisibility::default(),
        skills: vec![],
        educations: vec![],
        experiences: vec![],
        projects: vec![],
        social_links: SocialLinks::default(),
        profile_completeness: 0,
        created_at: now,
        updated_at: now,
    };
    profile.touch(now);
    profile
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.user_by_email(email))
    }

    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|u| u.email_verification_token.as_deref() == Some(token))
                .cloned()
        }))
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|u| u.password_reset_token.as_deref() == Some(token))
                .cloned()
        }))
    }

    async fn create(&self, new: NewUser, profile: ProfileSeed) -> AppResult<User> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == new.email) {
                return Err(AppError::conflict("User with this email"));
            }
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                email: new.email,
                password_hash: new.password_hash,
                first_name: new.first_name,
                last_name: new.last_name,
                role: new.role,
                status: UserStatus::Active,
                email_verified: new.email_verified,
                email_verification_token: new.email_verification_token,
                email_verification_expires: new.email_verification_expires,
                password_reset_token: None,
                password_reset_expires: None,
                login_attempts: 0,
                lock_until: None,
                last_login: None,
                created_at: now,
                updated_at: now,
            };

            match profile {
                ProfileSeed::JobSeeker {
                    university,
                    field_of_study,
                } => t
                    .job_seekers
                    .push(seeker_profile(user.id, university, field_of_study)),
                ProfileSeed::Employer {
                    company_name,
                    business_email,
                    contact_person_name,
                    industry,
                    company_size,
                    website,
                    description,
                } => {
                    let mut profile = EmployerProfile {
                        id: Uuid::new_v4(),
                        user_id: user.id,
                        company_name,
                        business_email,
                        contact_person_name,
                        website,
                        description,
                        logo_url: None,
                        industry,
                        company_size,
                        founded_year: None,
                        headquarters: None,
                        phone: None,
                        address: None,
                        city_id: None,
                        social_links: SocialLinks::default(),
                        verified: false,
                        profile_completeness: 0,
                        created_at: now,
                        updated_at: now,
                    };
                    profile.touch(now);
                    t.employers.push(profile);
                }
                ProfileSeed::None => {}
            }

            t.users.push(user.clone());
            Ok(user)
        })
    }

    async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.update_user(id, |u| {
            u.login_attempts = 0;
            u.lock_until = None;
            u.last_login = Some(at);
        })?;
        Ok(())
    }

    async fn record_login_failure(&self, id: Uuid, lock_until: DateTime<Utc>) -> AppResult<bool> {
        let mut locked = false;
        self.update_user(id, |u| {
            u.login_attempts += 1;
            if u.login_attempts >= MAX_LOGIN_ATTEMPTS {
                u.login_attempts = 0;
                u.lock_until = Some(lock_until);
                locked = true;
            }
        })?;
        Ok(locked)
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        token: String,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        self.update_user(id, |u| {
            u.email_verification_token = Some(token);
            u.email_verification_expires = Some(expires);
        })?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<User> {
        self.update_user(id, |u| {
            u.email_verified = true;
            u.email_verification_token = None;
            u.email_verification_expires = None;
        })
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: String,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        self.update_user(id, |u| {
            u.password_reset_token = Some(token);
            u.password_reset_expires = Some(expires);
        })?;
        Ok(())
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: String,
        mark_verified: bool,
    ) -> AppResult<()> {
        self.update_user(id, |u| {
            u.password_hash = password_hash;
            u.password_reset_token = None;
            u.password_reset_expires = None;
            u.login_attempts = 0;
            u.lock_until = None;
            if mark_verified {
                u.email_verified = true;
            }
        })?;
        Ok(())
    }

    async fn set_email(&self, id: Uuid, email: String) -> AppResult<User> {
        let taken = self.with(|t| t.users.iter().any(|u| u.id != id && u.email == email));
        if taken {
            return Err(AppError::conflict("Email"));
        }
        self.update_user(id, |u| u.email = email)
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        self.update_user(id, |u| u.status = status)
    }

    async fn list(
        &self,
        role: Option<Role>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<User>, u64)> {
        Ok(self.with(|t| {
            let mut users: Vec<User> = t
                .users
                .iter()
                .filter(|u| role.map(|r| u.role == r).unwrap_or(true))
                .cloned()
                .collect();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total = users.len() as u64;
            (page(&users, offset, limit), total)
        }))
    }

    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        Ok(self.with(|t| t.users.iter().filter(|u| u.role == role).count() as u64))
    }
}

#[async_trait]
impl JobSeekerRepository for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<JobSeekerProfile>> {
        Ok(self.with(|t| t.job_seekers.iter().find(|p| p.user_id == user_id).cloned()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobSeekerProfile>> {
        Ok(self.with(|t| t.job_seekers.iter().find(|p| p.id == id).cloned()))
    }

    async fn save(&self, profile: JobSeekerProfile) -> AppResult<JobSeekerProfile> {
        self.with(|t| {
            let slot = t
                .job_seekers
                .iter_mut()
                .find(|p| p.id == profile.id)
                .ok_or_else(|| AppError::not_found("Job seeker profile"))?;
            *slot = profile.clone();
            Ok(profile)
        })
    }

    async fn list_public(&self, offset: u64, limit: u64) -> AppResult<(Vec<ProfessionalCard>, u64)> {
        Ok(self.with(|t| {
            let t = &*t;
            let mut listed: Vec<(&JobSeekerProfile, &User)> = t
                .job_seekers
                .iter()
                .filter(|p| p.profile_visibility == ProfileVisibility::Public)
                .filter_map(|p| {
                    t.users
                        .iter()
                        .find(|u| u.id == p.user_id && u.status == UserStatus::Active)
                        .map(|u| (p, u))
                })
                .collect();
            listed.sort_by(|(a, _), (b, _)| {
                b.profile_completeness
                    .cmp(&a.profile_completeness)
                    .then(b.updated_at.cmp(&a.updated_at))
            });
            let total = listed.len() as u64;
            let cards = listed
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|(profile, user)| {
                    let city = profile.city_id.and_then(|id| {
                        t.cities.iter().find(|c| c.id == id).map(CatalogEntry::from)
                    });
                    ProfessionalCard::new(
                        profile.clone(),
                        user.first_name.clone(),
                        user.last_name.clone(),
                        city,
                    )
                })
                .collect();
            (cards, total)
        }))
    }
}

#[async_trait]
impl EmployerRepository for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<EmployerProfile>> {
        Ok(self.with(|t| t.employers.iter().find(|p| p.user_id == user_id).cloned()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EmployerProfile>> {
        Ok(self.with(|t| t.employers.iter().find(|p| p.id == id).cloned()))
    }

    async fn save(&self, profile: EmployerProfile) -> AppResult<EmployerProfile> {
        self.with(|t| {
            let slot = t
                .employers
                .iter_mut()
                .find(|p| p.id == profile.id)
                .ok_or_else(|| AppError::not_found("Employer profile"))?;
            *slot = profile.clone();
            Ok(profile)
        })
    }
}

#[async_trait]
impl JobPostRepository for MemoryStore {
    async fn create(&self, employer_id: Uuid, new: NewJobPost) -> AppResult<JobPost> {
        let now = Utc::now();
        let max_applications = new.max_applications();
        let post = JobPost {
            id: Uuid::new_v4(),
            employer_id,
            title: new.title,
            description: new.description,
            responsibilities: new.responsibilities,
            requirements: new.requirements,
            preferred_skills: new.preferred_skills,
            experience_level: new.experience_level,
            experience_min_years: new.experience_min_years,
            experience_max_years: new.experience_max_years,
            category_id: new.category_id,
            job_type_id: new.job_type_id,
            city_id: new.city_id,
            salary: new.salary,
            benefits: new.benefits,
            work_arrangement: new.work_arrangement,
            deadline: new.deadline,
            tags: new.tags,
            max_applications,
            view_count: 0,
            application_count: 0,
            featured: false,
            status: JobPostStatus::Draft,
            is_approved: false,
            approved_by: None,
            approved_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.with(|t| t.job_posts.push(post.clone()));
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        Ok(self.post(id))
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        match self.update_post(id, |p| p.view_count += 1) {
            Ok(post) => Ok(Some(post)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_content(&self, post: JobPost) -> AppResult<JobPost> {
        self.with(|t| {
            let slot = t
                .job_posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or_else(|| AppError::not_found("Job post"))?;
            *slot = JobPost {
                status: slot.status,
                is_approved: slot.is_approved,
                application_count: slot.application_count,
                view_count: slot.view_count,
                ..post
            };
            Ok(slot.clone())
        })
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<JobPost> {
        self.with(|t| {
            let post = t
                .job_posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::not_found("Job post"))?;
            if post.status != from {
                return Err(AppError::InvalidTransition(Transition::JobPost(post.status, to)));
            }
            post.status = to;
            post.updated_at = Utc::now();
            Ok(post.clone())
        })
    }

    async fn approve(
        &self,
        id: Uuid,
        admin_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<JobPost>> {
        let post = self.post(id).ok_or_else(|| AppError::not_found("Job post"))?;
        if post.is_approved && post.status == JobPostStatus::Published {
            return Ok(None);
        }
        self.update_post(id, |p| {
            p.is_approved = true;
            p.status = JobPostStatus::Published;
            p.approved_by = Some(admin_id);
            p.approved_at = Some(at);
            p.updated_at = at;
        })
        .map(Some)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<JobPost> {
        self.update_post(id, |p| {
            p.status = JobPostStatus::Closed;
            p.is_active = false;
            p.updated_at = Utc::now();
        })
    }

    async fn list_public(
        &self,
        filter: JobPostFilter,
        now: DateTime<Utc>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)> {
        Ok(self.with(|t| {
            let mut posts: Vec<JobPost> = t
                .job_posts
                .iter()
                .filter(|p| p.is_publicly_visible(now) && filter.matches(p))
                .cloned()
                .collect();
            posts.sort_by(|a, b| {
                b.featured
                    .cmp(&a.featured)
                    .then(b.created_at.cmp(&a.created_at))
            });
            let total = posts.len() as u64;
            (page(&posts, offset, limit), total)
        }))
    }

    async fn list_by_employer(&self, employer_id: Uuid) -> AppResult<Vec<JobPost>> {
        Ok(self.with(|t| {
            t.job_posts
                .iter()
                .filter(|p| p.employer_id == employer_id && p.is_active)
                .cloned()
                .collect()
        }))
    }

    async fn list_admin(
        &self,
        filter: AdminPostFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<JobPost>, u64)> {
        Ok(self.with(|t| {
            let posts: Vec<JobPost> = t
                .job_posts
                .iter()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect();
            let total = posts.len() as u64;
            (page(&posts, offset, limit), total)
        }))
    }

    async fn expire_past_deadline(&self, now: DateTime<Utc>) -> AppResult<u64> {
        Ok(self.with(|t| {
            let mut expired = 0;
            for post in t
                .job_posts
                .iter_mut()
                .filter(|p| p.status == JobPostStatus::Published && p.deadline < now)
            {
                post.status = JobPostStatus::Expired;
                expired += 1;
            }
            expired
        }))
    }

    async fn count_pending(&self) -> AppResult<u64> {
        Ok(self.with(|t| {
            t.job_posts
                .iter()
                .filter(|p| AdminPostFilter::Pending.matches(p))
                .count() as u64
        }))
    }

    async fn count_by_status(&self, status: JobPostStatus) -> AppResult<u64> {
        Ok(self.with(|t| {
            t.job_posts
                .iter()
                .filter(|p| p.status == status && p.is_active)
                .count() as u64
        }))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn submit(&self, new: NewApplication) -> AppResult<Application> {
        self.with(|t| {
            if t.applications
                .iter()
                .any(|a| a.job_seeker_id == new.job_seeker_id && a.job_post_id == new.job_post_id)
            {
                return Err(AppError::DuplicateApplication);
            }
            let now = Utc::now();
            let post = t
                .job_posts
                .iter_mut()
                .find(|p| p.id == new.job_post_id && p.is_open_for_applications(now))
                .ok_or_else(|| {
                    AppError::validation("This job is no longer accepting applications")
                })?;
            post.application_count += 1;

            let application = Application {
                id: Uuid::new_v4(),
                job_seeker_id: new.job_seeker_id,
                job_post_id: new.job_post_id,
                resume_url: new.resume_url,
                cover_letter_url: new.cover_letter_url,
                notes: new.notes,
                status: ApplicationStatus::Applied,
                employer_notes: None,
                applied_at: now,
                updated_at: now,
                status_history: vec![],
            };
            t.applications.push(application.clone());
            Ok(application)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        Ok(self.with(|t| t.applications.iter().find(|a| a.id == id).cloned()))
    }

    async fn update_status(&self, id: Uuid, change: StatusChange) -> AppResult<Application> {
        self.with(|t| {
            let application = t
                .applications
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AppError::not_found("Application"))?;
            if application.status != change.from {
                return Err(AppError::InvalidTransition(Transition::Application(
                    application.status,
                    change.status,
                )));
            }
            application.status = change.status;
            application.updated_at = change.at;
            application.status_history.push(change.entry());
            Ok(application.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let index = t
                .applications
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| AppError::not_found("Application"))?;
            let removed = t.applications.remove(index);
            if let Some(post) = t.job_posts.iter_mut().find(|p| p.id == removed.job_post_id) {
                post.application_count = (post.application_count - 1).max(0);
            }
            Ok(())
        })
    }

    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<ApplicationView>> {
        Ok(self.with(|t| {
            let t = &*t;
            let mut views: Vec<ApplicationView> = t
                .applications
                .iter()
                .filter(|a| a.job_seeker_id == job_seeker_id)
                .map(|a| Self::view(t, a))
                .collect();
            views.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
            views
        }))
    }

    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<ApplicationView>> {
        Ok(self.with(|t| {
            let t = &*t;
            let owned: Vec<Uuid> = t
                .job_posts
                .iter()
                .filter(|p| p.employer_id == employer_id)
                .map(|p| p.id)
                .collect();
            let mut views: Vec<ApplicationView> = t
                .applications
                .iter()
                .filter(|a| owned.contains(&a.job_post_id))
                .map(|a| Self::view(t, a))
                .collect();
            views.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
            views
        }))
    }

    async fn count_for_post(&self, job_post_id: Uuid) -> AppResult<u64> {
        Ok(self.with(|t| {
            t.applications
                .iter()
                .filter(|a| a.job_post_id == job_post_id)
                .count() as u64
        }))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.with(|t| t.applications.len() as u64))
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn categories(&self) -> AppResult<Vec<JobCategory>> {
        Ok(self.with(|t| {
            let mut categories: Vec<JobCategory> =
                t.categories.iter().filter(|c| c.is_active).cloned().collect();
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            categories
        }))
    }

    async fn job_types(&self) -> AppResult<Vec<JobType>> {
        Ok(self.with(|t| t.job_types.iter().filter(|j| j.is_active).cloned().collect()))
    }

    async fn cities(&self) -> AppResult<Vec<City>> {
        Ok(self.with(|t| t.cities.clone()))
    }

    async fn create_category(&self, category: NewCategory) -> AppResult<JobCategory> {
        self.with(|t| {
            if t.categories.iter().any(|c| c.name.eq_ignore_ascii_case(&category.name)) {
                return Err(AppError::conflict("Category"));
            }
            let created = JobCategory {
                id: Uuid::new_v4(),
                name: category.name,
                description: category.description,
                is_active: true,
            };
            t.categories.push(created.clone());
            Ok(created)
        })
    }

    async fn create_job_type(&self, job_type: NewJobType) -> AppResult<JobType> {
        self.with(|t| {
            if t.job_types.iter().any(|j| j.name.eq_ignore_ascii_case(&job_type.name)) {
                return Err(AppError::conflict("Job type"));
            }
            let created = JobType {
                id: Uuid::new_v4(),
                name: job_type.name,
                is_active: true,
            };
            t.job_types.push(created.clone());
            Ok(created)
        })
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<JobCategory>> {
        Ok(self.with(|t| t.categories.iter().find(|c| c.id == id).cloned()))
    }

    async fn update_category(&self, id: Uuid, category: NewCategory) -> AppResult<JobCategory> {
        self.with(|t| {
            if t
                .categories
                .iter()
                .any(|c| c.id != id && c.name.eq_ignore_ascii_case(&category.name))
            {
                return Err(AppError::conflict("Job category"));
            }
            let slot = t
                .categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::not_found("Job category"))?;
            slot.name = category.name;
            slot.description = category.description;
            Ok(slot.clone())
        })
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.categories.len();
            t.categories.retain(|c| c.id != id);
            if t.categories.len() == before {
                return Err(AppError::not_found("Job category"));
            }
            for post in t.job_posts.iter_mut().filter(|p| p.category_id == Some(id)) {
                post.category_id = None;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl FeedbackRepository for MemoryStore {
    async fn create(&self, employer_id: Uuid, new: NewFeedback) -> AppResult<Feedback> {
        let now = Utc::now();
        let feedback = Feedback {
            id: Uuid::new_v4(),
            employer_id,
            job_seeker_id: new.job_seeker_id,
            job_title: new.job_title,
            rating: new.rating,
            feedback: new.feedback,
            skills: new.skills,
            would_recommend: new.would_recommend,
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
        };
        self.with(|t| t.feedback.push(feedback.clone()));
        Ok(feedback)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeedbackView>> {
        Ok(self.with(|t| {
            let t = &*t;
            t.feedback
                .iter()
                .find(|f| f.id == id)
                .map(|f| feedback_view(t, f))
        }))
    }

    async fn list_for_employer(&self, employer_id: Uuid) -> AppResult<Vec<FeedbackView>> {
        Ok(self.with(|t| {
            let t = &*t;
            t.feedback
                .iter()
                .rev()
                .filter(|f| f.employer_id == employer_id)
                .map(|f| feedback_view(t, f))
                .collect()
        }))
    }

    async fn list_for_seeker(&self, job_seeker_id: Uuid) -> AppResult<Vec<FeedbackView>> {
        Ok(self.with(|t| {
            let t = &*t;
            t.feedback
                .iter()
                .rev()
                .filter(|f| f.job_seeker_id == job_seeker_id)
                .map(|f| feedback_view(t, f))
                .collect()
        }))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn job_metrics(&self, filter: JobAnalyticsFilter) -> AppResult<Vec<JobMetrics>> {
        Ok(self.with(|t| {
            let t = &*t;
            t.job_posts
                .iter()
                .filter(|post| filter.matches(post))
                .map(|post| {
                    let applied: Vec<&Application> = t
                        .applications
                        .iter()
                        .filter(|a| a.job_post_id == post.id)
                        .collect();
                    let with_status = |status: ApplicationStatus| {
                        applied.iter().filter(|a| a.status == status).count() as u64
                    };
                    JobMetrics {
                        id: post.id,
                        title: post.title.clone(),
                        status: post.status,
                        view_count: post.view_count,
                        applied_count: applied.len() as u64,
                        shortlisted_count: with_status(ApplicationStatus::Shortlisted),
                        rejected_count: with_status(ApplicationStatus::Rejected),
                        employer_name: t
                            .employers
                            .iter()
                            .find(|e| e.id == post.employer_id)
                            .map(|e| e.company_name.clone()),
                        category_name: post.category_id.and_then(|id| {
                            t.categories.iter().find(|c| c.id == id).map(|c| c.name.clone())
                        }),
                        type_name: post.job_type_id.and_then(|id| {
                            t.job_types.iter().find(|j| j.id == id).map(|j| j.name.clone())
                        }),
                    }
                })
                .collect()
        }))
    }

    async fn application_report(
        &self,
        filter: ApplicationReportFilter,
        limit: u64,
    ) -> AppResult<ApplicationReport> {
        Ok(self.with(|t| {
            let t = &*t;
            let applicant = |a: &Application| {
                t.job_seekers
                    .iter()
                    .find(|s| s.id == a.job_seeker_id)
                    .and_then(|s| t.users.iter().find(|u| u.id == s.user_id))
            };
            let post = |a: &Application| t.job_posts.iter().find(|p| p.id == a.job_post_id);

            let mut matched: Vec<&Application> = t
                .applications
                .iter()
                .filter(|&a| {
                    let (first, last) = applicant(a)
                        .map(|u| (u.first_name.as_str(), u.last_name.as_str()))
                        .unwrap_or_default();
                    let title = post(a).map(|p| p.title.as_str()).unwrap_or_default();
                    filter.matches(a, [first, last], title)
                })
                .collect();
            matched.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));

            let stats = ApplicationStats::from_counts(matched.iter().map(|a| (a.status, 1)));
            let applications = matched
                .into_iter()
                .take(limit as usize)
                .map(|a| {
                    let user = applicant(a);
                    let job = post(a);
                    ApplicationReportRow {
                        id: a.id,
                        applicant_name: user.map(|u| format!("{} {}", u.first_name, u.last_name)),
                        applicant_email: user.map(|u| u.email.clone()),
                        job_title: job.map(|p| p.title.clone()),
                        company_name: job.and_then(|p| {
                            t.employers
                                .iter()
                                .find(|e| e.id == p.employer_id)
                                .map(|e| e.company_name.clone())
                        }),
                        status: a.status,
                        applied_at: a.applied_at,
                    }
                })
                .collect();
            ApplicationReport { applications, stats }
        }))
    }
}

/// Unit of work handing out the same store for every repository.
#[derive(Default, Clone)]
pub struct MemoryUnitOfWork {
    pub store: Arc<MemoryStore>,
}

impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.store.clone()
    }

    fn job_seekers(&self) -> Arc<dyn JobSeekerRepository> {
        self.store.clone()
    }

    fn employers(&self) -> Arc<dyn EmployerRepository> {
        self.store.clone()
    }

    fn job_posts(&self) -> Arc<dyn JobPostRepository> {
        self.store.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.store.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.store.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackRepository> {
        self.store.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.store.clone()
    }
}

/// Keeps every email instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailJob>>,
}

impl RecordingMailer {
    pub fn sent_to(&self, to: &str) -> Vec<EmailJob> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.to == to)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl skillbridge::infra::Mailer for RecordingMailer {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Uploads kept as URLs only.
#[derive(Default)]
pub struct MemoryStorage {
    pub stored: Mutex<Vec<String>>,
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn store(&self, kind: UploadKind, owner: Uuid, file: UploadedFile) -> AppResult<String> {
        kind.check(&file)?;
        let url = format!(
            "{}/{}/{}-{}",
            UPLOAD_URL_PREFIX,
            kind.directory(),
            owner,
            file.file_name
        );
        self.stored.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        self.stored.lock().unwrap().retain(|u| u != url);
        Ok(())
    }
}

/// Scores jobs in the order given.
pub struct StubRecommender;

#[async_trait]
impl Recommender for StubRecommender {
    async fn recommend(
        &self,
        _job_seeker: JobSeekerProfile,
        jobs: Vec<JobPost>,
    ) -> AppResult<Vec<ScoredJob>> {
        Ok(jobs
            .iter()
            .enumerate()
            .map(|(i, job)| ScoredJob {
                id: job.id,
                similarity: 1.0 - i as f64 * 0.1,
                match_label: "Good Match".to_string(),
                details: serde_json::Value::Null,
            })
            .collect())
    }
}

/// Allows or refuses every request.
pub struct FixedLimiter {
    pub allow: bool,
}

#[async_trait]
impl RateLimiter for FixedLimiter {
    async fn check(
        &self,
        _identifier: &str,
        max_requests: u64,
        _window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        if self.allow {
            Ok((1, true))
        } else {
            Ok((max_requests + 1, false))
        }
    }
}

pub struct StaticHealth {
    pub name: &'static str,
    pub healthy: bool,
}

#[async_trait]
impl HealthCheck for StaticHealth {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::internal("connection refused"))
        }
    }
}

/// Services, adapters and store wired together for one test.
pub struct TestApp {
    pub uow: MemoryUnitOfWork,
    pub mailer: Arc<RecordingMailer>,
    pub storage: Arc<MemoryStorage>,
    pub services: Arc<Services>,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        let config = config();
        let uow = MemoryUnitOfWork::default();
        let mailer = Arc::new(RecordingMailer::default());
        let storage = Arc::new(MemoryStorage::default());
        let services = Arc::new(Services::new(
            Arc::new(uow.clone()),
            &config,
            mailer.clone(),
            storage.clone(),
            Arc::new(StubRecommender),
        ));

        Self {
            uow,
            mailer,
            storage,
            services,
            tokens: TokenService::new(&config),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.uow.store
    }

    pub fn router(&self) -> Router {
        self.router_with(true, true)
    }

    pub fn router_with(&self, allow_requests: bool, healthy: bool) -> Router {
        let services: Arc<dyn ServiceContainer> = self.services.clone();
        let health: Vec<Arc<dyn HealthCheck>> = vec![
            Arc::new(StaticHealth { name: "database", healthy: true }),
            Arc::new(StaticHealth { name: "redis", healthy }),
        ];
        let state = AppState::new(
            services,
            Arc::new(FixedLimiter { allow: allow_requests }),
            health,
        );
        create_router(state, &config())
    }

    /// Insert a verified, active account of `role` with its profile.
    pub async fn seed_user(&self, role: Role, email: &str) -> CurrentUser {
        let password = Password::new(STRONG_PASSWORD).unwrap();
        let profile = match role {
            Role::JobSeeker => ProfileSeed::JobSeeker {
                university: "University of Moratuwa".to_string(),
                field_of_study: Some("Computer Science".to_string()),
            },
            Role::Employer => ProfileSeed::Employer {
                company_name: "Acme Labs".to_string(),
                business_email: email.to_string(),
                contact_person_name: "Kamal Silva".to_string(),
                industry: None,
                company_size: None,
                website: None,
                description: None,
            },
            Role::Admin => ProfileSeed::None,
        };
        let user = UserRepository::create(
            self.store(),
            NewUser {
                email: email.to_string(),
                password_hash: password.into_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                role,
                email_verified: true,
                email_verification_token: None,
                email_verification_expires: None,
            },
            profile,
        )
        .await
        .unwrap();
        CurrentUser::from(&user)
    }

    /// Give a seeded job seeker a resume on their profile.
    pub async fn give_resume(&self, seeker: &CurrentUser) {
        let mut profile = JobSeekerRepository::find_by_user(self.store(), seeker.id)
            .await
            .unwrap()
            .unwrap();
        profile.resume_url = Some(format!("/uploads/resumes/{}.pdf", seeker.id));
        JobSeekerRepository::save(self.store(), profile).await.unwrap();
    }

    pub fn bearer(&self, user: &CurrentUser) -> String {
        format!("Bearer {}", self.tokens.issue(user.id).unwrap().access_token)
    }
}

/// A valid post body with a deadline a month out.
pub fn new_job_post(title: &str) -> NewJobPost {
    NewJobPost {
        title: title.to_string(),
        description: "Build and maintain backend services".to_string(),
        responsibilities: vec![],
        requirements: vec![],
        preferred_skills: vec!["Rust".to_string()],
        experience_level: ExperienceLevel::Entry,
        experience_min_years: None,
        experience_max_years: None,
        category_id: None,
        job_type_id: None,
        city_id: None,
        salary: Salary::default(),
        benefits: vec![],
        work_arrangement: WorkArrangement::Hybrid,
        deadline: Utc::now() + Duration::days(30),
        tags: vec!["backend".to_string()],
        max_applications: Some(10),
    }
}
