//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! List-shaped and nested profile data live in JSONB columns.

pub mod application;
pub mod application_status;
pub mod city;
pub mod employer;
pub mod feedback;
pub mod job_category;
pub mod job_post;
pub mod job_seeker;
pub mod job_type;
pub mod user;

use sea_orm::prelude::Json;
use serde::{de::DeserializeOwned, Serialize};

/// Decode a JSON column, falling back to the empty value on malformed data.
pub(crate) fn from_json<T: DeserializeOwned + Default>(value: Json) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap_or_default()
}
