//! User repository implementation.
//!
//! Accounts are never hard-deleted. Signup writes the user row and its role
//! profile in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    employer, job_seeker,
    user::{self, ActiveModel, Entity as UserEntity},
};
use super::is_unique_violation;
use crate::config::MAX_LOGIN_ATTEMPTS;
use crate::domain::{
    Availability, EmployerProfile, JobSeekerProfile, NewUser, ProfileSeed, ProfileVisibility,
    Role, SocialLinks, User, UserStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>>;

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Create the user and its profile row; `Conflict` when the email is taken
    async fn create(&self, user: NewUser, profile: ProfileSeed) -> AppResult<User>;

    /// Reset the failure counter and stamp `last_login`
    async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Count a failed sign-in. Returns true when this failure locked the account.
    async fn record_login_failure(&self, id: Uuid, lock_until: DateTime<Utc>) -> AppResult<bool>;

    async fn set_verification_token(
        &self,
        id: Uuid,
        token: String,
        expires: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark the email verified and drop the token
    async fn mark_verified(&self, id: Uuid) -> AppResult<User>;

    async fn set_reset_token(&self, id: Uuid, token: String, expires: DateTime<Utc>)
        -> AppResult<()>;

    /// Store a new hash, clear the reset token and any lock
    async fn set_password(&self, id: Uuid, password_hash: String, mark_verified: bool)
        -> AppResult<()>;

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User>;

    /// Replace the sign-in email; `Conflict` when another account holds it
    async fn set_email(&self, id: Uuid, email: String) -> AppResult<User>;

    /// Newest first, optionally filtered by role
    async fn list(&self, role: Option<Role>, offset: u64, limit: u64)
        -> AppResult<(Vec<User>, u64)>;

    async fn count_by_role(&self, role: Role) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: user::Column, value: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn require(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(user::Column::Email, email).await
    }

    async fn find_by_verification_token(&self, token: &str) -> AppResult<Option<User>> {
        self.find_one(user::Column::EmailVerificationToken, token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        self.find_one(user::Column::PasswordResetToken, token).await
    }

    async fn create(&self, new_user: NewUser, profile: ProfileSeed) -> AppResult<User> {
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let active_model = ActiveModel {
            id: Set(user_id),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            email_verified: Set(new_user.email_verified),
            email_verification_token: Set(new_user.email_verification_token),
            email_verification_expires: Set(new_user.email_verification_expires),
            password_reset_token: Set(None),
            password_reset_expires: Set(None),
            login_attempts: Set(0),
            lock_until: Set(None),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = match active_model.insert(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => return Err(AppError::conflict("User")),
            Err(e) => return Err(e.into()),
        };

        match profile {
            ProfileSeed::JobSeeker {
                university,
                field_of_study,
            } => {
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
                    skills: Vec::new(),
                    educations: Vec::new(),
                    experiences: Vec::new(),
                    projects: Vec::new(),
                    social_links: SocialLinks::default(),
                    profile_completeness: 0,
                    created_at: now,
                    updated_at: now,
                };
                profile.touch(now);
                job_seeker::ActiveModel::from(&profile).insert(&txn).await?;
            }
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
                    user_id,
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
                employer::ActiveModel::from(&profile).insert(&txn).await?;
            }
            ProfileSeed::None => {}
        }

        txn.commit().await?;
        User::try_from(model)
    }

    async fn record_login_success(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        UserEntity::update_many()
            .col_expr(user::Column::LoginAttempts, Expr::value(0))
            .col_expr(user::Column::LockUntil, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(user::Column::LastLogin, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn record_login_failure(&self, id: Uuid, lock_until: DateTime<Utc>) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        UserEntity::update_many()
            .col_expr(
                user::Column::LoginAttempts,
                Expr::col(user::Column::LoginAttempts).add(1),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        let locked = UserEntity::update_many()
            .col_expr(user::Column::LoginAttempts, Expr::value(0))
            .col_expr(user::Column::LockUntil, Expr::value(Some(lock_until)))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::LoginAttempts.gte(MAX_LOGIN_ATTEMPTS))
            .exec(&txn)
            .await?
            .rows_affected
            > 0;

        txn.commit().await?;
        Ok(locked)
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        token: String,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.email_verification_token = Set(Some(token));
        active.email_verification_expires = Set(Some(expires));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<User> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.email_verified = Set(true);
        active.email_verification_token = Set(None);
        active.email_verification_expires = Set(None);
        active.updated_at = Set(Utc::now());
        User::try_from(active.update(&self.db).await?)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: String,
        expires: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.password_reset_token = Set(Some(token));
        active.password_reset_expires = Set(Some(expires));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: String,
        mark_verified: bool,
    ) -> AppResult<()> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.password_hash = Set(password_hash);
        active.password_reset_token = Set(None);
        active.password_reset_expires = Set(None);
        active.login_attempts = Set(0);
        active.lock_until = Set(None);
        if mark_verified {
            active.email_verified = Set(true);
            active.email_verification_token = Set(None);
            active.email_verification_expires = Set(None);
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        User::try_from(active.update(&self.db).await?)
    }

    async fn set_email(&self, id: Uuid, email: String) -> AppResult<User> {
        let mut active: ActiveModel = self.require(id).await?.into();
        active.email = Set(email);
        active.updated_at = Set(Utc::now());
        match active.update(&self.db).await {
            Ok(model) => User::try_from(model),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict("Email")),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(
        &self,
        role: Option<Role>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let users = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, total))
    }

    async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        Ok(UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await?)
    }
}
