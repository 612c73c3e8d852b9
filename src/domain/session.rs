//! The signed-in caller, resolved once per request by the auth middleware.

use serde::Serialize;
use uuid::Uuid;

use super::{Access, Role, User};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with `Forbidden` when the role is outside `access`.
    pub fn authorize(&self, access: Access) -> AppResult<()> {
        if access.permits(self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
