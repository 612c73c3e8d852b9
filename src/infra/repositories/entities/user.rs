//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::User;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub email_verification_token: Option<String>,
    pub email_verification_expires: Option<DateTimeUtc>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTimeUtc>,
    pub login_attempts: i32,
    pub lock_until: Option<DateTimeUtc>,
    pub last_login: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role.parse()?,
            status: model.status.parse()?,
            email_verified: model.email_verified,
            email_verification_token: model.email_verification_token,
            email_verification_expires: model.email_verification_expires,
            password_reset_token: model.password_reset_token,
            password_reset_expires: model.password_reset_expires,
            login_attempts: model.login_attempts,
            lock_until: model.lock_until,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
