//! Employer profile, dashboard and candidate feedback handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use super::feedback_handler::{create_feedback, get_written, list_written};
use crate::api::extractors::{UploadForm, ValidatedJson};
use crate::api::AppState;
use crate::domain::{ApplicationView, CurrentUser, EmployerProfile, EmployerProfileChanges, JobPost};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Multipart field carrying the company logo
pub const LOGO_FIELD: &str = "logo";

/// Employer routes. Gated to employers by the router.
pub fn employer_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/logo", post(upload_logo))
        .route("/jobposts", get(list_job_posts))
        .route("/applications", get(list_applications))
        .route("/candidate-feedback", post(create_feedback))
        .route("/feedbacks", get(list_written))
        .route("/feedbacks/:id", get(get_written))
}

/// Get the caller's company profile
#[utoipa::path(
    get,
    operation_id = "employer_get_profile",
    path = "/employer/profile",
    tag = "Employers",
    responses(
        (status = 200, description = "Company profile", body = EmployerProfile),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<EmployerProfile>>> {
    let profile = state.services.profiles().employer(user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

#[utoipa::path(
    put,
    operation_id = "employer_update_profile",
    path = "/employer/profile",
    tag = "Employers",
    request_body = EmployerProfileChanges,
    responses(
        (status = 200, description = "Company profile updated", body = EmployerProfile),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(changes): ValidatedJson<EmployerProfileChanges>,
) -> AppResult<Json<ApiResponse<EmployerProfile>>> {
    let profile = state
        .services
        .profiles()
        .update_employer(user.id, changes)
        .await?;
    Ok(Json(ApiResponse::with_message(profile, "Company profile updated")))
}

/// Upload a company logo (`logo` field)
#[utoipa::path(
    post,
    path = "/employer/profile/logo",
    tag = "Employers",
    request_body(content_type = "multipart/form-data", description = "`logo`: jpeg, png, gif or webp up to 5 MB"),
    responses(
        (status = 200, description = "Logo stored", body = EmployerProfile),
        (status = 400, description = "Missing or invalid file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_logo(
    State(state): State<AppState>,
    user: CurrentUser,
    mut form: UploadForm,
) -> AppResult<Json<ApiResponse<EmployerProfile>>> {
    let file = form.require_file(LOGO_FIELD)?;
    let profile = state
        .services
        .profiles()
        .upload_company_logo(user.id, file)
        .await?;
    Ok(Json(ApiResponse::with_message(profile, "Company logo updated")))
}

/// Every post the caller's company owns, including drafts
#[utoipa::path(
    get,
    operation_id = "employer_list_job_posts",
    path = "/employer/jobposts",
    tag = "Employers",
    responses((status = 200, description = "Company job posts", body = [JobPost])),
    security(("bearer_auth" = []))
)]
pub async fn list_job_posts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<JobPost>>>> {
    let posts = state.services.job_posts().list_for_employer(&user).await?;
    Ok(Json(ApiResponse::success(posts)))
}

/// Applications received across the company's posts
#[utoipa::path(
    get,
    operation_id = "employer_list_applications",
    path = "/employer/applications",
    tag = "Employers",
    responses((status = 200, description = "Applications", body = [ApplicationView])),
    security(("bearer_auth" = []))
)]
pub async fn list_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<ApplicationView>>>> {
    let applications = state
        .services
        .applications()
        .list_for_employer(&user)
        .await?;
    Ok(Json(ApiResponse::success(applications)))
}
