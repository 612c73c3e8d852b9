//! Job seeker profile, resume, dashboard and received feedback handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use super::feedback_handler::{get_received, list_received};
use crate::api::extractors::{UploadForm, ValidatedJson};
use crate::api::AppState;
use crate::domain::{ApplicationView, CurrentUser, JobSeekerProfile, JobSeekerProfileChanges};
use crate::errors::AppResult;
use crate::services::Recommendation;
use crate::types::ApiResponse;

/// Multipart field carrying the profile picture
pub const PROFILE_IMAGE_FIELD: &str = "profileImage";
/// Multipart field carrying a resume
pub const RESUME_FIELD: &str = "cv";

/// Job seeker routes. Gated to job seekers by the router.
pub fn jobseeker_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/picture", post(upload_picture))
        .route("/resume", post(upload_resume).delete(remove_resume))
        .route("/applications", get(list_applications))
        .route("/recommendations", get(recommendations))
        .route("/feedbacks", get(list_received))
        .route("/feedbacks/:id", get(get_received))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/jobseeker/profile",
    tag = "Job Seekers",
    responses(
        (status = 200, description = "Profile", body = JobSeekerProfile),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<JobSeekerProfile>>> {
    let profile = state.services.profiles().job_seeker(user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Update profile fields; completeness is recomputed
#[utoipa::path(
    put,
    path = "/jobseeker/profile",
    tag = "Job Seekers",
    request_body = JobSeekerProfileChanges,
    responses(
        (status = 200, description = "Profile updated", body = JobSeekerProfile),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(changes): ValidatedJson<JobSeekerProfileChanges>,
) -> AppResult<Json<ApiResponse<JobSeekerProfile>>> {
    let profile = state
        .services
        .profiles()
        .update_job_seeker(user.id, changes)
        .await?;
    Ok(Json(ApiResponse::with_message(profile, "Profile updated")))
}

/// Upload a profile picture (`profileImage` field)
#[utoipa::path(
    post,
    path = "/jobseeker/profile/picture",
    tag = "Job Seekers",
    request_body(content_type = "multipart/form-data", description = "`profileImage`: jpeg, png, gif or webp up to 5 MB"),
    responses(
        (status = 200, description = "Picture stored", body = JobSeekerProfile),
        (status = 400, description = "Missing or invalid file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_picture(
    State(state): State<AppState>,
    user: CurrentUser,
    mut form: UploadForm,
) -> AppResult<Json<ApiResponse<JobSeekerProfile>>> {
    let file = form.require_file(PROFILE_IMAGE_FIELD)?;
    let profile = state
        .services
        .profiles()
        .upload_profile_picture(user.id, file)
        .await?;
    Ok(Json(ApiResponse::with_message(profile, "Profile picture updated")))
}

/// Upload a resume (`cv` field)
#[utoipa::path(
    post,
    path = "/jobseeker/resume",
    tag = "Job Seekers",
    request_body(content_type = "multipart/form-data", description = "`cv`: pdf, doc or docx up to 5 MB"),
    responses(
        (status = 200, description = "Resume stored", body = JobSeekerProfile),
        (status = 400, description = "Missing or invalid file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    mut form: UploadForm,
) -> AppResult<Json<ApiResponse<JobSeekerProfile>>> {
    let file = form.require_file(RESUME_FIELD)?;
    let profile = state.services.profiles().upload_resume(user.id, file).await?;
    Ok(Json(ApiResponse::with_message(profile, "Resume uploaded")))
}

/// Remove the resume on file
#[utoipa::path(
    delete,
    path = "/jobseeker/resume",
    tag = "Job Seekers",
    responses((status = 200, description = "Resume removed", body = JobSeekerProfile)),
    security(("bearer_auth" = []))
)]
pub async fn remove_resume(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<JobSeekerProfile>>> {
    let profile = state.services.profiles().remove_resume(user.id).await?;
    Ok(Json(ApiResponse::with_message(profile, "Resume removed")))
}

/// The caller's applications, newest first
#[utoipa::path(
    get,
    path = "/jobseeker/applications",
    tag = "Job Seekers",
    responses((status = 200, description = "Applications", body = [ApplicationView])),
    security(("bearer_auth" = []))
)]
pub async fn list_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<ApplicationView>>>> {
    let applications = state.services.applications().list_for_seeker(&user).await?;
    Ok(Json(ApiResponse::success(applications)))
}

/// Open posts scored against the caller's profile
#[utoipa::path(
    get,
    path = "/jobseeker/recommendations",
    tag = "Job Seekers",
    responses(
        (status = 200, description = "Recommended posts, best match first", body = [Recommendation]),
        (status = 500, description = "Recommendation service failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn recommendations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Recommendation>>>> {
    let jobs = state.services.recommendations().recommend(&user).await?;
    Ok(Json(ApiResponse::success(jobs)))
}
