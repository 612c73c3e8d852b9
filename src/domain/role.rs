//! Roles and route access.
//!
//! `Role` is the closed set of account kinds. `Access` names what a route
//! group requires; `Access::allowed_roles` is the single mapping from route
//! groups to roles, and `Role::dashboard_route` the single mapping from roles
//! to their landing page.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_EMPLOYER, ROLE_JOB_SEEKER};
use crate::errors::AppError;

/// Account role. Fixed at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Job Seeker", alias = "jobseeker")]
    JobSeeker,
    #[serde(alias = "employer")]
    Employer,
    #[serde(alias = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => ROLE_JOB_SEEKER,
            Role::Employer => ROLE_EMPLOYER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Where the client should send a freshly signed-in user.
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Role::JobSeeker => "/seeker/dashboard",
            Role::Employer => "/employer/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_JOB_SEEKER | "jobseeker" => Ok(Role::JobSeeker),
            ROLE_EMPLOYER | "employer" => Ok(Role::Employer),
            ROLE_ADMIN | "admin" => Ok(Role::Admin),
            other => Err(AppError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// What a route group requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in account
    Authenticated,
    JobSeeker,
    Employer,
    Admin,
    /// Employers and admins (application review)
    Recruiter,
}

impl Access {
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Access::Authenticated => &[Role::JobSeeker, Role::Employer, Role::Admin],
            Access::JobSeeker => &[Role::JobSeeker],
            Access::Employer => &[Role::Employer],
            Access::Admin => &[Role::Admin],
            Access::Recruiter => &[Role::Employer, Role::Admin],
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_storage_name() {
        for role in [Role::JobSeeker, Role::Employer, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_with_display_name() {
        assert_eq!(serde_json::to_string(&Role::JobSeeker).unwrap(), "\"Job Seeker\"");
        let parsed: Role = serde_json::from_str("\"jobseeker\"").unwrap();
        assert_eq!(parsed, Role::JobSeeker);
    }

    #[test]
    fn test_dashboard_routes_are_distinct() {
        assert_eq!(Role::Admin.dashboard_route(), "/admin/dashboard");
        assert_ne!(Role::JobSeeker.dashboard_route(), Role::Employer.dashboard_route());
    }

    #[test]
    fn test_access_matrix() {
        assert!(Access::Authenticated.permits(Role::JobSeeker));
        assert!(Access::Recruiter.permits(Role::Employer));
        assert!(Access::Recruiter.permits(Role::Admin));
        assert!(!Access::Recruiter.permits(Role::JobSeeker));
        assert!(!Access::Admin.permits(Role::Employer));
        assert!(!Access::JobSeeker.permits(Role::Admin));
    }
}
