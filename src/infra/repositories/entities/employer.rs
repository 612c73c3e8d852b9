//! Employer profile entity.

use sea_orm::entity::prelude::*;

use super::{from_json, to_json};
use crate::domain::{CompanySize, EmployerProfile};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub company_name: String,
    pub business_email: String,
    pub contact_person_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: Json,
    pub verified: bool,
    pub profile_completeness: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EmployerProfile {
    fn from(model: Model) -> Self {
        EmployerProfile {
            id: model.id,
            user_id: model.user_id,
            company_name: model.company_name,
            business_email: model.business_email,
            contact_person_name: model.contact_person_name,
            website: model.website,
            description: model.description,
            logo_url: model.logo_url,
            industry: model.industry,
            company_size: model.company_size.as_deref().and_then(CompanySize::parse),
            founded_year: model.founded_year,
            headquarters: model.headquarters,
            phone: model.phone,
            address: model.address,
            city_id: model.city_id,
            social_links: from_json(model.social_links),
            verified: model.verified,
            profile_completeness: model.profile_completeness,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&EmployerProfile> for ActiveModel {
    fn from(p: &EmployerProfile) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
            company_name: Set(p.company_name.clone()),
            business_email: Set(p.business_email.clone()),
            contact_person_name: Set(p.contact_person_name.clone()),
            website: Set(p.website.clone()),
            description: Set(p.description.clone()),
            logo_url: Set(p.logo_url.clone()),
            industry: Set(p.industry.clone()),
            company_size: Set(p.company_size.map(|s| s.as_str().to_string())),
            founded_year: Set(p.founded_year),
            headquarters: Set(p.headquarters.clone()),
            phone: Set(p.phone.clone()),
            address: Set(p.address.clone()),
            city_id: Set(p.city_id),
            social_links: Set(to_json(&p.social_links)),
            verified: Set(p.verified),
            profile_completeness: Set(p.profile_completeness),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
    }
}
