//! Job post entity.

use sea_orm::entity::prelude::*;

use super::{from_json, to_json};
use crate::domain::{JobPost, Salary};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "job_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub responsibilities: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub requirements: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub preferred_skills: Json,
    pub experience_level: String,
    pub experience_min_years: Option<i32>,
    pub experience_max_years: Option<i32>,
    pub category_id: Option<Uuid>,
    pub job_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: String,
    pub salary_negotiable: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub benefits: Json,
    pub work_arrangement: String,
    pub deadline: DateTimeUtc,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub max_applications: i32,
    pub view_count: i32,
    pub application_count: i32,
    pub featured: bool,
    pub status: String,
    pub is_approved: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeUtc>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for JobPost {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(JobPost {
            id: model.id,
            employer_id: model.employer_id,
            title: model.title,
            description: model.description,
            responsibilities: from_json(model.responsibilities),
            requirements: from_json(model.requirements),
            preferred_skills: from_json(model.preferred_skills),
            experience_level: model.experience_level.parse()?,
            experience_min_years: model.experience_min_years,
            experience_max_years: model.experience_max_years,
            category_id: model.category_id,
            job_type_id: model.job_type_id,
            city_id: model.city_id,
            salary: Salary {
                min: model.salary_min,
                max: model.salary_max,
                currency: model.salary_currency,
                negotiable: model.salary_negotiable,
            },
            benefits: from_json(model.benefits),
            work_arrangement: model.work_arrangement.parse()?,
            deadline: model.deadline,
            tags: from_json(model.tags),
            max_applications: model.max_applications,
            view_count: model.view_count,
            application_count: model.application_count,
            featured: model.featured,
            status: model.status.parse()?,
            is_approved: model.is_approved,
            approved_by: model.approved_by,
            approved_at: model.approved_at,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Content columns only. Counters and lifecycle fields are written by
/// dedicated statements so concurrent edits never overwrite them.
pub(crate) fn content_changes(post: &JobPost) -> ActiveModel {
    use sea_orm::{NotSet, Set};

    ActiveModel {
        id: Set(post.id),
        employer_id: NotSet,
        title: Set(post.title.clone()),
        description: Set(post.description.clone()),
        responsibilities: Set(to_json(&post.responsibilities)),
        requirements: Set(to_json(&post.requirements)),
        preferred_skills: Set(to_json(&post.preferred_skills)),
        experience_level: Set(post.experience_level.as_str().to_string()),
        experience_min_years: Set(post.experience_min_years),
        experience_max_years: Set(post.experience_max_years),
        category_id: Set(post.category_id),
        job_type_id: Set(post.job_type_id),
        city_id: Set(post.city_id),
        salary_min: Set(post.salary.min),
        salary_max: Set(post.salary.max),
        salary_currency: Set(post.salary.currency.clone()),
        salary_negotiable: Set(post.salary.negotiable),
        benefits: Set(to_json(&post.benefits)),
        work_arrangement: Set(post.work_arrangement.as_str().to_string()),
        deadline: Set(post.deadline),
        tags: Set(to_json(&post.tags)),
        max_applications: Set(post.max_applications),
        view_count: NotSet,
        application_count: NotSet,
        featured: NotSet,
        status: NotSet,
        is_approved: NotSet,
        approved_by: NotSet,
        approved_at: NotSet,
        is_active: NotSet,
        created_at: NotSet,
        updated_at: Set(post.updated_at),
    }
}
