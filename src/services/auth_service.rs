//! Authentication service - Signup, sign-in and account recovery.
//!
//! Sign-in refuses unverified, inactive, suspended and locked accounts.
//! Five failed attempts lock the account for fifteen minutes. Password
//! hashing stays in the domain `Password` value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::token_service::{TokenResponse, TokenService};
use crate::config::{
    ACCOUNT_TOKEN_BYTES, EMAIL_VERIFICATION_TTL_HOURS, LOGIN_LOCK_MINUTES,
    PASSWORD_RESET_TTL_MINUTES,
};
use crate::domain::validation::{
    check_person_name, check_university_email, normalize_email, split_full_name,
};
use crate::domain::{
    CompanySize, CurrentUser, NewUser, Password, ProfileSeed, Role, User, UserResponse, UserStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Mailer, UnitOfWork};
use crate::jobs::{EmailComposer, EmailJob};

/// Argon2 hash checked when the email is unknown, so both paths cost the same.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2tpbGxicmlkZ2VkdW1teQ$3Qk1u6nQ3hBv0pMChq4D1m1o9a6pV2Gc3cQK1s1pQ2Y";

/// Job seeker registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerSignup {
    #[schema(example = "Nimal")]
    pub first_name: String,
    #[schema(example = "Perera")]
    pub last_name: String,
    /// University address ending in `.ac.lk`
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "nimal@uom.ac.lk")]
    pub email: String,
    #[schema(example = "Str0ng!Pass")]
    pub password: String,
    #[validate(length(min = 2, message = "University is required"))]
    #[schema(example = "University of Moratuwa")]
    pub university: String,
    pub field_of_study: Option<String>,
}

/// Employer registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployerSignup {
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "hr@acme.lk")]
    pub email: String,
    pub password: String,
    #[validate(length(min = 2, max = 100, message = "Company name must be 2-100 characters"))]
    #[schema(example = "Acme Labs")]
    pub company_name: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "Contact person name must be 2-100 characters"
    ))]
    #[schema(example = "Kamal Silva")]
    pub contact_person_name: String,
    pub company_size: Option<CompanySize>,
    #[validate(length(min = 2, max = 50, message = "Industry must be 2-50 characters"))]
    pub industry: Option<String>,
    #[validate(url(message = "Please provide a valid website URL"))]
    pub company_website: Option<String>,
    #[validate(length(max = 500, message = "Company description cannot exceed 500 characters"))]
    pub company_description: Option<String>,
}

/// Admin account created by another admin
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignup {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Successful sign-in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignIn {
    pub token: TokenResponse,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn signup_job_seeker(&self, input: JobSeekerSignup) -> AppResult<User>;

    async fn signup_employer(&self, input: EmployerSignup) -> AppResult<User>;

    /// Create a verified admin account. Callers check that the actor is an admin.
    async fn create_admin(&self, input: AdminSignup) -> AppResult<User>;

    async fn signin(&self, email: String, password: String) -> AppResult<SignIn>;

    /// Resolve a bearer token to the signed-in caller
    async fn authenticate(&self, token: &str) -> AppResult<CurrentUser>;

    async fn me(&self, user_id: uuid::Uuid) -> AppResult<User>;

    async fn verify_email(&self, token: String) -> AppResult<User>;

    async fn resend_verification(&self, email: String) -> AppResult<()>;

    /// Succeeds whether or not the email is registered
    async fn forgot_password(&self, email: String) -> AppResult<()>;

    async fn reset_password(&self, token: String, password: String) -> AppResult<()>;
}

/// Hex encoded random token for verification and reset links.
pub(crate) fn account_token() -> String {
    let mut bytes = [0u8; ACCOUNT_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    emails: EmailComposer,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(
        uow: Arc<U>,
        tokens: TokenService,
        mailer: Arc<dyn Mailer>,
        emails: EmailComposer,
    ) -> Self {
        Self {
            uow,
            tokens,
            mailer,
            emails,
        }
    }

    /// Create an unverified account and mail its verification link.
    async fn register(&self, user: NewUser, profile: ProfileSeed) -> AppResult<User> {
        let token = account_token();
        let user = NewUser {
            email_verified: false,
            email_verification_token: Some(token.clone()),
            email_verification_expires: Some(
                Utc::now() + Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            ),
            ..user
        };

        let created = self.uow.users().create(user, profile).await?;
        self.mailer
            .send(
                self.emails
                    .verification(&created.email, &created.full_name(), &token),
            )
            .await?;

        tracing::info!(user_id = %created.id, role = %created.role, "User signed up");
        Ok(created)
    }

    async fn send_best_effort(&self, email: EmailJob) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!(to = %to, error = %e, "Failed to send notification email");
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn signup_job_seeker(&self, input: JobSeekerSignup) -> AppResult<User> {
        let email = normalize_email(&input.email);
        check_university_email(&email)?;
        check_person_name("First name", &input.first_name)?;
        check_person_name("Last name", &input.last_name)?;
        let password = Password::new(&input.password)?;

        let user = NewUser {
            email,
            password_hash: password.into_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: Role::JobSeeker,
            email_verified: false,
            email_verification_token: None,
            email_verification_expires: None,
        };
        let profile = ProfileSeed::JobSeeker {
            university: input.university.trim().to_string(),
            field_of_study: input.field_of_study,
        };

        self.register(user, profile).await
    }

    async fn signup_employer(&self, input: EmployerSignup) -> AppResult<User> {
        let email = normalize_email(&input.email);
        let password = Password::new(&input.password)?;
        let (first_name, last_name) = split_full_name(&input.contact_person_name);

        let user = NewUser {
            email: email.clone(),
            password_hash: password.into_string(),
            first_name,
            last_name,
            role: Role::Employer,
            email_verified: false,
            email_verification_token: None,
            email_verification_expires: None,
        };
        let profile = ProfileSeed::Employer {
            company_name: input.company_name.trim().to_string(),
            business_email: email,
            contact_person_name: input.contact_person_name.trim().to_string(),
            industry: input.industry,
            company_size: input.company_size,
            website: input.company_website.filter(|w| !w.is_empty()),
            description: input.company_description.filter(|d| !d.is_empty()),
        };

        self.register(user, profile).await
    }

    async fn create_admin(&self, input: AdminSignup) -> AppResult<User> {
        check_person_name("First name", &input.first_name)?;
        check_person_name("Last name", &input.last_name)?;
        let password = Password::new(&input.password)?;

        let user = NewUser {
            email: normalize_email(&input.email),
            password_hash: password.into_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: Role::Admin,
            email_verified: true,
            email_verification_token: None,
            email_verification_expires: None,
        };

        let created = self.uow.users().create(user, ProfileSeed::None).await?;
        tracing::info!(user_id = %created.id, "Admin account created");
        Ok(created)
    }

    async fn signin(&self, email: String, password: String) -> AppResult<SignIn> {
        let now = Utc::now();
        let users = self.uow.users();

        let Some(user) = users.find_by_email(&normalize_email(&email)).await? else {
            // Same hashing cost as a real account
            let _ = Password::from_hash(DUMMY_HASH.to_string()).verify(&password);
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked(now) {
            return Err(AppError::AccountLocked);
        }

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            let locked = users
                .record_login_failure(user.id, now + Duration::minutes(LOGIN_LOCK_MINUTES))
                .await?;
            if locked {
                tracing::warn!(user_id = %user.id, "Account locked after repeated failed sign-ins");
                return Err(AppError::AccountLocked);
            }
            return Err(AppError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AppError::validation(
                "Email address not verified. Please check your inbox",
            ));
        }
        if user.status != UserStatus::Active {
            return Err(AppError::AccountInactive(user.status));
        }

        users.record_login_success(user.id, now).await?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
        Ok(SignIn {
            token,
            user: UserResponse::from(User {
                last_login: Some(now),
                login_attempts: 0,
                lock_until: None,
                ..user
            }),
        })
    }

    async fn authenticate(&self, token: &str) -> AppResult<CurrentUser> {
        let user_id = self.tokens.verify(token)?;
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active() {
            return Err(AppError::AccountInactive(user.status));
        }
        Ok(CurrentUser::from(&user))
    }

    async fn me(&self, user_id: uuid::Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found("User")
    }

    async fn verify_email(&self, token: String) -> AppResult<User> {
        let users = self.uow.users();
        let user = users
            .find_by_verification_token(&token)
            .await?
            .filter(|u| u.verification_token_valid(&token, Utc::now()))
            .ok_or_else(|| AppError::validation("Invalid or expired verification token"))?;

        let user = users.mark_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "Email verified");

        self.send_best_effort(self.emails.welcome(
            &user.email,
            &user.full_name(),
            user.role.dashboard_route(),
        ))
        .await;

        Ok(user)
    }

    async fn resend_verification(&self, email: String) -> AppResult<()> {
        let users = self.uow.users();
        let Some(user) = users.find_by_email(&normalize_email(&email)).await? else {
            tracing::debug!("Verification resend requested for unknown email");
            return Ok(());
        };
        if user.email_verified {
            return Err(AppError::validation("Email address is already verified"));
        }

        let token = account_token();
        users
            .set_verification_token(
                user.id,
                token.clone(),
                Utc::now() + Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            )
            .await?;
        self.mailer
            .send(self.emails.verification(&user.email, &user.full_name(), &token))
            .await
    }

    async fn forgot_password(&self, email: String) -> AppResult<()> {
        let users = self.uow.users();
        let Some(user) = users.find_by_email(&normalize_email(&email)).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = account_token();
        users
            .set_reset_token(
                user.id,
                token.clone(),
                Utc::now() + Duration::minutes(PASSWORD_RESET_TTL_MINUTES),
            )
            .await?;
        self.mailer
            .send(self.emails.password_reset(&user.email, &user.full_name(), &token))
            .await?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    async fn reset_password(&self, token: String, password: String) -> AppResult<()> {
        let users = self.uow.users();
        let user = users
            .find_by_reset_token(&token)
            .await?
            .filter(|u| u.reset_token_valid(&token, Utc::now()))
            .ok_or_else(|| AppError::validation("Invalid or expired reset token"))?;

        let password = Password::new(&password)?;
        users
            .set_password(user.id, password.into_string(), false)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infra::{MockMailer, MockUserRepository};
    use crate::services::test_support::{user, TestUnitOfWork};
    use mockall::predicate::eq;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn service(users: MockUserRepository, mailer: MockMailer) -> Authenticator<TestUnitOfWork> {
        let config = Config::for_secret(SECRET);
        Authenticator::new(
            Arc::new(TestUnitOfWork::default().with_users(users)),
            TokenService::new(&config),
            Arc::new(mailer),
            EmailComposer::new("no-reply@skillbridge.lk", "http://localhost:5173", "help@skillbridge.lk"),
        )
    }

    fn with_password(mut u: User, plain: &str) -> User {
        u.password_hash = Password::new(plain).unwrap().into_string();
        u
    }

    #[test]
    fn test_account_token_is_64_hex_chars() {
        let token = account_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, account_token());
    }

    #[tokio::test]
    async fn test_signup_rejects_non_university_email() {
        let auth = service(MockUserRepository::new(), MockMailer::new());
        let result = auth
            .signup_job_seeker(JobSeekerSignup {
                first_name: "Nimal".into(),
                last_name: "Perera".into(),
                email: "nimal@gmail.com".into(),
                password: "Str0ng!Pass".into(),
                university: "University of Moratuwa".into(),
                field_of_study: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_sends_verification_email() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(1).returning(|new, _| {
            assert!(!new.email_verified);
            assert!(new.email_verification_token.is_some());
            let mut created = user(Role::JobSeeker, UserStatus::Active);
            created.email = new.email;
            created.email_verified = false;
            Ok(created)
        });
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|job| job.to == "nimal@uom.ac.lk" && job.subject.contains("Verify"))
            .times(1)
            .returning(|_| Ok(()));

        let created = service(users, mailer)
            .signup_job_seeker(JobSeekerSignup {
                first_name: "Nimal".into(),
                last_name: "Perera".into(),
                email: "  Nimal@UOM.ac.lk ".into(),
                password: "Str0ng!Pass".into(),
                university: "University of Moratuwa".into(),
                field_of_study: Some("Computer Science".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.email, "nimal@uom.ac.lk");
    }

    #[tokio::test]
    async fn test_signin_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users, MockMailer::new())
            .signin("ghost@uom.ac.lk".into(), "whatever".into())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signin_unverified_is_refused() {
        let mut account = with_password(user(Role::JobSeeker, UserStatus::Active), "Str0ng!Pass");
        account.email_verified = false;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let result = service(users, MockMailer::new())
            .signin("nimal@uom.ac.lk".into(), "Str0ng!Pass".into())
            .await;
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("not verified")),
            other => panic!("unexpected: {:?}", other.map(|s| s.user.id)),
        }
    }

    #[tokio::test]
    async fn test_signin_suspended_is_refused() {
        let account = with_password(user(Role::Employer, UserStatus::Suspended), "Str0ng!Pass");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let result = service(users, MockMailer::new())
            .signin("hr@acme.lk".into(), "Str0ng!Pass".into())
            .await;
        assert!(matches!(
            result,
            Err(AppError::AccountInactive(UserStatus::Suspended))
        ));
    }

    #[tokio::test]
    async fn test_signin_locked_account_skips_password_check() {
        let mut account = user(Role::JobSeeker, UserStatus::Active);
        account.lock_until = Some(Utc::now() + Duration::minutes(5));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        users.expect_record_login_failure().never();

        let result = service(users, MockMailer::new())
            .signin("nimal@uom.ac.lk".into(), "wrong".into())
            .await;
        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_fifth_failure_locks() {
        let account = with_password(user(Role::JobSeeker, UserStatus::Active), "Str0ng!Pass");
        let id = account.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        users
            .expect_record_login_failure()
            .withf(move |uid, _| *uid == id)
            .times(1)
            .returning(|_, _| Ok(true));

        let result = service(users, MockMailer::new())
            .signin("nimal@uom.ac.lk".into(), "Wr0ng!Pass".into())
            .await;
        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_signin_issues_token_for_same_user() {
        let account = with_password(user(Role::JobSeeker, UserStatus::Active), "Str0ng!Pass");
        let id = account.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        users
            .expect_record_login_success()
            .with(eq(id), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));

        let auth = service(users, MockMailer::new());
        let signed_in = auth
            .signin("nimal@uom.ac.lk".into(), "Str0ng!Pass".into())
            .await
            .unwrap();
        assert_eq!(signed_in.user.dashboard, "/seeker/dashboard");
        assert_eq!(auth.tokens.verify(&signed_in.token.access_token).unwrap(), id);
    }

    #[tokio::test]
    async fn test_verify_email_swallows_welcome_failure() {
        let mut pending = user(Role::JobSeeker, UserStatus::Active);
        pending.email_verified = false;
        pending.email_verification_token = Some("abc".into());
        pending.email_verification_expires = Some(Utc::now() + Duration::hours(1));
        let verified = User {
            email_verified: true,
            email_verification_token: None,
            ..pending.clone()
        };

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_token()
            .returning(move |_| Ok(Some(pending.clone())));
        users
            .expect_mark_verified()
            .times(1)
            .returning(move |_| Ok(verified.clone()));
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(AppError::internal("queue down")));

        let user = service(users, mailer).verify_email("abc".into()).await.unwrap();
        assert!(user.email_verified);
    }

    #[tokio::test]
    async fn test_verify_email_rejects_expired_token() {
        let mut pending = user(Role::JobSeeker, UserStatus::Active);
        pending.email_verification_token = Some("abc".into());
        pending.email_verification_expires = Some(Utc::now() - Duration::minutes(1));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_token()
            .returning(move |_| Ok(Some(pending.clone())));
        users.expect_mark_verified().never();

        let result = service(users, MockMailer::new())
            .verify_email("abc".into())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_forgot_password_is_silent_for_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        assert!(service(users, mailer)
            .forgot_password("ghost@uom.ac.lk".into())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_forgot_password_propagates_mail_failure() {
        let account = user(Role::Employer, UserStatus::Active);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        users.expect_set_reset_token().returning(|_, _, _| Ok(()));
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(AppError::internal("queue down")));

        let result = service(users, mailer)
            .forgot_password("hr@acme.lk".into())
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_user() {
        let config = Config::for_secret(SECRET);
        let token = TokenService::new(&config).issue(uuid::Uuid::new_v4()).unwrap();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let result = service(users, MockMailer::new())
            .authenticate(&token.access_token)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
