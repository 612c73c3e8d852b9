//! Application entity.
//!
//! `(job_seeker_id, job_post_id)` carries a unique index; a violation on
//! insert is the duplicate-application signal.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_seeker_id: Uuid,
    pub job_post_id: Uuid,
    pub resume_url: String,
    pub cover_letter_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub employer_notes: Option<String>,
    pub applied_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::application_status::Entity")]
    History,
}

impl Related<super::application_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
