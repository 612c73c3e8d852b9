//! Application handlers.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::{UploadForm, ValidatedJson};
use crate::api::handlers::jobseeker_handler::RESUME_FIELD;
use crate::api::middleware::{auth_middleware, authorize};
use crate::api::AppState;
use crate::domain::{Access, Application, CurrentUser};
use crate::errors::{AppError, AppResult};
use crate::services::{StatusUpdate, Submission};
use crate::types::{ApiResponse, Created};

/// Multipart field carrying the cover letter
pub const COVER_LETTER_FIELD: &str = "coverLetter";

/// Application routes. Every route needs a signed-in caller; the finer
/// ownership checks live in the service.
pub fn application_routes(state: &AppState) -> Router<AppState> {
    let seeker = || middleware::from_fn_with_state(Access::JobSeeker, authorize);
    let recruiter = || middleware::from_fn_with_state(Access::Recruiter, authorize);

    Router::new()
        .route("/", post(submit_application).route_layer(seeker()))
        .route("/:id", get(get_application).delete(delete_application))
        .route(
            "/:id/status",
            patch(update_application_status).route_layer(recruiter()),
        )
        .route(
            "/:id/withdraw",
            post(withdraw_application).route_layer(seeker()),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Apply to a job post
#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    request_body(
        content_type = "multipart/form-data",
        description = "`jobPostId`, optional `useProfileResume=true`, `cv` and `coverLetter` files (pdf, doc, docx), optional `notes`"
    ),
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Post closed, resume missing or duplicate application"),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_application(
    State(state): State<AppState>,
    user: CurrentUser,
    mut form: UploadForm,
) -> AppResult<Created<Application>> {
    let job_post_id = form
        .text("jobPostId")
        .ok_or_else(|| AppError::validation("Job post ID is required"))?
        .parse::<Uuid>()
        .map_err(|_| AppError::validation("Job post ID is invalid"))?;

    let submission = Submission {
        job_post_id,
        use_profile_resume: form.flag("useProfileResume"),
        notes: form.text("notes").map(str::to_string),
        resume: form.take_file(RESUME_FIELD),
        cover_letter: form.take_file(COVER_LETTER_FIELD),
    };

    let application = state
        .services
        .applications()
        .submit(&user, submission)
        .await?;
    Ok(Created(application))
}

/// Application detail for the applicant, the owning employer or an admin
#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application", body = Application),
        (status = 403, description = "Not a party to this application"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_application(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let application = state.services.applications().get(&user, id).await?;
    Ok(Json(ApiResponse::success(application)))
}

/// Move an application along the hiring pipeline
#[utoipa::path(
    patch,
    path = "/applications/{id}/status",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = Application),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not the owning employer"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<StatusUpdate>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let application = state
        .services
        .applications()
        .update_status(&user, id, update)
        .await?;
    Ok(Json(ApiResponse::with_message(
        application,
        "Application status updated",
    )))
}

#[utoipa::path(
    post,
    path = "/applications/{id}/withdraw",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application withdrawn", body = Application),
        (status = 403, description = "Not the applicant"),
        (status = 409, description = "Already in a final state")
    ),
    security(("bearer_auth" = []))
)]
pub async fn withdraw_application(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let application = state.services.applications().withdraw(&user, id).await?;
    Ok(Json(ApiResponse::with_message(
        application,
        "Application withdrawn",
    )))
}

/// Delete an application and its history
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application deleted"),
        (status = 403, description = "Not the applicant or an admin"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_application(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.applications().delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Application deleted")))
}
