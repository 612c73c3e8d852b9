//! Lookup data referenced by posts and profiles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobType {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub country: String,
}

/// Id and display name of any catalog row, used in joined views.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
}

impl From<&JobCategory> for CatalogEntry {
    fn from(c: &JobCategory) -> Self {
        Self { id: c.id, name: c.name.clone() }
    }
}

impl From<&JobType> for CatalogEntry {
    fn from(t: &JobType) -> Self {
        Self { id: t.id, name: t.name.clone() }
    }
}

impl From<&City> for CatalogEntry {
    fn from(c: &City) -> Self {
        Self { id: c.id, name: c.name.clone() }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCategory {
    #[validate(length(min = 2, max = 100, message = "Category name must be 2-100 characters"))]
    #[schema(example = "Software Engineering")]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewJobType {
    #[validate(length(min = 2, max = 50, message = "Job type name must be 2-50 characters"))]
    #[schema(example = "Internship")]
    pub name: String,
}
