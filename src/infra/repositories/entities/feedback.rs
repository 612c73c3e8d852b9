//! Employer feedback entity.

use sea_orm::entity::prelude::*;

use super::from_json;
use crate::domain::Feedback;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employer_id: Uuid,
    pub job_seeker_id: Uuid,
    pub job_title: String,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Json,
    pub would_recommend: bool,
    pub is_public: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Feedback {
    fn from(model: Model) -> Self {
        Feedback {
            id: model.id,
            employer_id: model.employer_id,
            job_seeker_id: model.job_seeker_id,
            job_title: model.job_title,
            rating: model.rating,
            feedback: model.feedback,
            skills: from_json(model.skills),
            would_recommend: model.would_recommend,
            is_public: model.is_public,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
