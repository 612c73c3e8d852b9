//! Catalog handlers: categories, job types and cities.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, authorize};
use crate::api::AppState;
use crate::domain::{Access, City, JobCategory, JobType, NewCategory, NewJobType};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Catalog routes. Reads are public; changes are admin only.
pub fn catalog_routes(state: &AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
        .route("/types", post(create_job_type))
        .route_layer(middleware::from_fn_with_state(Access::Admin, authorize))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:id", get(get_category))
        .route("/types", get(list_job_types))
        .route("/cities", get(list_cities))
        .merge(admin_only)
}

#[utoipa::path(
    get,
    path = "/catalog/categories",
    tag = "Catalog",
    responses((status = 200, description = "Active job categories", body = [JobCategory]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<JobCategory>>>> {
    let categories = state.services.catalog().categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

#[utoipa::path(
    get,
    path = "/catalog/types",
    tag = "Catalog",
    responses((status = 200, description = "Active job types", body = [JobType]))
)]
pub async fn list_job_types(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<JobType>>>> {
    let types = state.services.catalog().job_types().await?;
    Ok(Json(ApiResponse::success(types)))
}

#[utoipa::path(
    get,
    path = "/catalog/cities",
    tag = "Catalog",
    responses((status = 200, description = "Cities", body = [City]))
)]
pub async fn list_cities(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<City>>>> {
    let cities = state.services.catalog().cities().await?;
    Ok(Json(ApiResponse::success(cities)))
}

#[utoipa::path(
    post,
    path = "/catalog/categories",
    tag = "Catalog",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = JobCategory),
        (status = 409, description = "Category already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> AppResult<Created<JobCategory>> {
    let category = state.services.catalog().create_category(payload).await?;
    Ok(Created(category))
}

#[utoipa::path(
    post,
    path = "/catalog/types",
    tag = "Catalog",
    request_body = NewJobType,
    responses(
        (status = 201, description = "Job type created", body = JobType),
        (status = 409, description = "Job type already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job_type(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewJobType>,
) -> AppResult<Created<JobType>> {
    let job_type = state.services.catalog().create_job_type(payload).await?;
    Ok(Created(job_type))
}

#[utoipa::path(
    get,
    path = "/catalog/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Job category", body = JobCategory),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobCategory>>> {
    let category = state.services.catalog().category(id).await?;
    Ok(Json(ApiResponse::success(category)))
}

#[utoipa::path(
    put,
    path = "/catalog/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = NewCategory,
    responses(
        (status = 200, description = "Category updated", body = JobCategory),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> AppResult<Json<ApiResponse<JobCategory>>> {
    let category = state.services.catalog().update_category(id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

/// Posts in the category keep existing without one
#[utoipa::path(
    delete,
    path = "/catalog/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog().delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
