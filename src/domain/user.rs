//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Role;
use crate::config::{STATUS_ACTIVE, STATUS_INACTIVE, STATUS_SUSPENDED};
use crate::errors::AppError;

/// Account status, managed by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => STATUS_ACTIVE,
            UserStatus::Inactive => STATUS_INACTIVE,
            UserStatus::Suspended => STATUS_SUSPENDED,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ACTIVE => Ok(UserStatus::Active),
            STATUS_INACTIVE => Ok(UserStatus::Inactive),
            STATUS_SUSPENDED => Ok(UserStatus::Suspended),
            other => Err(AppError::validation(format!("Unknown user status '{}'", other))),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub email_verification_expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Locked accounts refuse sign-in until `lock_until` passes.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.map(|until| until > now).unwrap_or(false)
    }

    /// Whether a verification token is still usable.
    pub fn verification_token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.email_verification_token.as_deref() == Some(token)
            && self.email_verification_expires.map(|exp| exp > now).unwrap_or(false)
    }

    /// Whether a password reset token is still usable.
    pub fn reset_token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.password_reset_token.as_deref() == Some(token)
            && self.password_reset_expires.map(|exp| exp > now).unwrap_or(false)
    }
}

/// Data needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub email_verified: bool,
    pub email_verification_token: Option<String>,
    pub email_verification_expires: Option<DateTime<Utc>>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "student@uom.ac.lk")]
    pub email: String,
    #[schema(example = "Nimal")]
    pub first_name: String,
    #[schema(example = "Perera")]
    pub last_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub email_verified: bool,
    /// Client route for this user's dashboard
    #[schema(example = "/seeker/dashboard")]
    pub dashboard: String,
    pub last_login: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            dashboard: user.role.dashboard_route().to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            status: user.status,
            email_verified: user.email_verified,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}
