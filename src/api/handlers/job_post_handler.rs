//! Job post handlers: the public board and the employer side of the
//! lifecycle.

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, authorize, identify};
use crate::api::AppState;
use crate::domain::{
    Access, CurrentUser, JobPost, JobPostChanges, JobPostFilter, JobPostStatus, NewJobPost,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Job post routes. Reads are public; writes need the owning employer.
pub fn job_post_routes(state: &AppState) -> Router<AppState> {
    let employer_only = Router::new()
        .route("/", post(create_job_post))
        .route("/:id", axum::routing::put(update_job_post).delete(delete_job_post))
        .route("/:id/pause", post(pause_job_post))
        .route("/:id/resume", post(resume_job_post))
        .route("/:id/close", post(close_job_post))
        .route_layer(middleware::from_fn_with_state(Access::Employer, authorize))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(list_job_posts))
        .route(
            "/:id",
            get(get_job_post)
                .route_layer(middleware::from_fn_with_state(state.clone(), identify)),
        )
        .merge(employer_only)
}

/// Public board: published, approved and before the deadline
#[utoipa::path(
    get,
    path = "/jobposts",
    tag = "Job Posts",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (max 100)"),
        ("categoryId" = Option<Uuid>, Query, description = "Filter by category"),
        ("jobTypeId" = Option<Uuid>, Query, description = "Filter by job type"),
        ("cityId" = Option<Uuid>, Query, description = "Filter by city"),
        ("keyword" = Option<String>, Query, description = "Search title, description and tags")
    ),
    responses((status = 200, description = "Visible posts, newest first"))
)]
pub async fn list_job_posts(
    State(state): State<AppState>,
    Query(filter): Query<JobPostFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<JobPost>>>> {
    let posts = state.services.job_posts().list_public(filter, page).await?;
    Ok(Json(ApiResponse::success(posts)))
}

/// Post detail. Off-board posts are visible to their employer and admins only.
#[utoipa::path(
    get,
    path = "/jobposts/{id}",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Job post", body = JobPost),
        (status = 404, description = "Job post not found")
    )
)]
pub async fn get_job_post(
    State(state): State<AppState>,
    viewer: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state.services.job_posts().get(viewer.as_ref(), id).await?;
    Ok(Json(ApiResponse::success(post)))
}

/// Create a draft awaiting admin approval
#[utoipa::path(
    post,
    path = "/jobposts",
    tag = "Job Posts",
    request_body = NewJobPost,
    responses(
        (status = 201, description = "Draft created", body = JobPost),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not an employer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewJobPost>,
) -> AppResult<Created<JobPost>> {
    let post = state.services.job_posts().create(&user, payload).await?;
    Ok(Created(post))
}

#[utoipa::path(
    put,
    path = "/jobposts/{id}",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    request_body = JobPostChanges,
    responses(
        (status = 200, description = "Post updated", body = JobPost),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job post not found"),
        (status = 409, description = "Post is closed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<JobPostChanges>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state.services.job_posts().update(&user, id, changes).await?;
    Ok(Json(ApiResponse::with_message(post, "Job post updated")))
}

/// Close and hide a post
#[utoipa::path(
    delete,
    path = "/jobposts/{id}",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.job_posts().delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Job post deleted")))
}

async fn transition(
    state: AppState,
    user: CurrentUser,
    id: Uuid,
    target: JobPostStatus,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state
        .services
        .job_posts()
        .transition(&user, id, target)
        .await?;
    let message = format!("Job post is now {}", post.status);
    Ok(Json(ApiResponse::with_message(post, message)))
}

/// Published → Paused
#[utoipa::path(
    post,
    path = "/jobposts/{id}/pause",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post paused", body = JobPost),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn pause_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    transition(state, user, id, JobPostStatus::Paused).await
}

/// Paused → Published, once approved
#[utoipa::path(
    post,
    path = "/jobposts/{id}/resume",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post published again", body = JobPost),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn resume_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    transition(state, user, id, JobPostStatus::Published).await
}

#[utoipa::path(
    post,
    path = "/jobposts/{id}/close",
    tag = "Job Posts",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post closed", body = JobPost),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn close_job_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    transition(state, user, id, JobPostStatus::Closed).await
}
