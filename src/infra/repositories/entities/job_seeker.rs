//! Job seeker profile entity.

use sea_orm::entity::prelude::*;

use super::{from_json, to_json};
use crate::domain::{Availability, JobSeekerProfile, ProfileVisibility};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "job_seekers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub statement_header: Option<String>,
    pub statement: Option<String>,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
    pub resume_url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub city_id: Option<Uuid>,
    pub availability: String,
    pub profile_visibility: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub educations: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub experiences: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub projects: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: Json,
    pub profile_completeness: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for JobSeekerProfile {
    fn from(model: Model) -> Self {
        JobSeekerProfile {
            id: model.id,
            user_id: model.user_id,
            statement_header: model.statement_header,
            statement: model.statement,
            university: model.university,
            field_of_study: model.field_of_study,
            resume_url: model.resume_url,
            profile_picture_url: model.profile_picture_url,
            city_id: model.city_id,
            availability: Availability::parse_lossy(&model.availability),
            profile_visibility: ProfileVisibility::parse_lossy(&model.profile_visibility),
            skills: from_json(model.skills),
            educations: from_json(model.educations),
            experiences: from_json(model.experiences),
            projects: from_json(model.projects),
            social_links: from_json(model.social_links),
            profile_completeness: model.profile_completeness,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&JobSeekerProfile> for ActiveModel {
    fn from(p: &JobSeekerProfile) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
            statement_header: Set(p.statement_header.clone()),
            statement: Set(p.statement.clone()),
            university: Set(p.university.clone()),
            field_of_study: Set(p.field_of_study.clone()),
            resume_url: Set(p.resume_url.clone()),
            profile_picture_url: Set(p.profile_picture_url.clone()),
            city_id: Set(p.city_id),
            availability: Set(p.availability.as_str().to_string()),
            profile_visibility: Set(p.profile_visibility.as_str().to_string()),
            skills: Set(to_json(&p.skills)),
            educations: Set(to_json(&p.educations)),
            experiences: Set(to_json(&p.experiences)),
            projects: Set(to_json(&p.projects)),
            social_links: Set(to_json(&p.social_links)),
            profile_completeness: Set(p.profile_completeness),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
    }
}
