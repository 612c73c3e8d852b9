//! Admin handlers: dashboard, account moderation, job post approval and reports.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    AdminPostFilter, ApplicationReport, ApplicationReportFilter, CurrentUser, JobAnalytics,
    JobAnalyticsFilter, JobPost, Role, UserResponse,
};
use crate::errors::AppResult;
use crate::services::{AdminOverview, AdminSignup, UserStatusUpdate};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// `jobseeker`, `employer` or `admin`
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobPostListQuery {
    /// `pending`, `all` or a post status
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminPasswordReset {
    #[schema(example = "N3w!Passw0rd")]
    pub password: String,
}

/// Every field accepts `all` for no filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReportQuery {
    pub date_range: Option<String>,
    pub job_category: Option<String>,
    pub job_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReportQuery {
    pub date_range: Option<String>,
    pub status: Option<String>,
    pub search_term: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminEmailChange {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops@skillbridge.lk")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPasswordChange {
    #[schema(example = "N3w!Passw0rd")]
    pub new_password: String,
}

/// Admin routes. Gated to admins by the router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/users", get(list_users))
        .route("/users/admins", post(create_admin))
        .route("/users/admins/:id/email", patch(update_admin_email))
        .route("/users/admins/:id/password", patch(update_admin_password))
        .route("/users/:id/status", patch(update_user_status))
        .route("/users/:id/reset-password", patch(reset_user_password))
        .route("/job-posts", get(list_job_posts))
        .route("/job-posts/:id", get(job_post_detail).delete(delete_job_post))
        .route("/job-posts/:id/approve", patch(approve_job_post))
        .route("/reports/jobs", get(job_report))
        .route("/reports/applications", get(application_report))
}

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/admin/overview",
    tag = "Admin",
    responses((status = 200, description = "Counts by role, post state and applications", body = AdminOverview)),
    security(("bearer_auth" = []))
)]
pub async fn overview(State(state): State<AppState>) -> AppResult<Json<ApiResponse<AdminOverview>>> {
    let overview = state.services.admin().overview().await?;
    Ok(Json(ApiResponse::success(overview)))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    params(
        ("role" = Option<String>, Query, description = "jobseeker, employer or admin"),
        ("page" = Option<u64>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "Accounts, newest first"),
        (status = 400, description = "Unknown role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<UserResponse>>>> {
    let role = query
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::parse::<Role>)
        .transpose()?;
    let users = state.services.admin().list_users(role, page).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// Create another admin account
#[utoipa::path(
    post,
    path = "/admin/users/admins",
    tag = "Admin",
    request_body = AdminSignup,
    responses(
        (status = 201, description = "Admin created", body = UserResponse),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    actor: CurrentUser,
    ValidatedJson(payload): ValidatedJson<AdminSignup>,
) -> AppResult<Created<UserResponse>> {
    let user = state.services.auth().create_admin(payload).await?;
    tracing::info!(admin_id = %actor.id, new_admin_id = %user.id, "Admin account created");
    Ok(Created(UserResponse::from(user)))
}

/// Activate, deactivate or suspend an account
#[utoipa::path(
    patch,
    path = "/admin/users/{id}/status",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserStatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 400, description = "Admins cannot deactivate themselves"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<UserStatusUpdate>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .services
        .admin()
        .update_user_status(&actor, id, update)
        .await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "User status updated",
    )))
}

/// Set a new password for an account
#[utoipa::path(
    patch,
    path = "/admin/users/{id}/reset-password",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AdminPasswordReset,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Weak password"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_user_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminPasswordReset>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .admin()
        .reset_user_password(id, payload.password)
        .await?;
    Ok(Json(ApiResponse::message("Password reset successfully")))
}

#[utoipa::path(
    get,
    operation_id = "admin_list_job_posts",
    path = "/admin/job-posts",
    tag = "Admin",
    params(
        ("status" = Option<String>, Query, description = "pending, all or a post status"),
        ("page" = Option<u64>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "Posts, newest first"),
        (status = 400, description = "Unknown status")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_job_posts(
    State(state): State<AppState>,
    Query(query): Query<JobPostListQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<JobPost>>>> {
    let filter: AdminPostFilter = query.status.as_deref().unwrap_or("all").parse()?;
    let posts = state.services.admin().list_job_posts(filter, page).await?;
    Ok(Json(ApiResponse::success(posts)))
}

/// Any post, including deleted ones
#[utoipa::path(
    get,
    path = "/admin/job-posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Job post", body = JobPost),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn job_post_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state.services.admin().job_post_detail(id).await?;
    Ok(Json(ApiResponse::success(post)))
}

/// Approve and publish a post
#[utoipa::path(
    patch,
    path = "/admin/job-posts/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post approved and published", body = JobPost),
        (status = 400, description = "Already approved"),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_job_post(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state.services.admin().approve_job_post(&actor, id).await?;
    Ok(Json(ApiResponse::with_message(
        post,
        "Job post approved and published",
    )))
}

/// Close and hide any post
#[utoipa::path(
    delete,
    operation_id = "admin_delete_job_post",
    path = "/admin/job-posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Post deleted", body = JobPost),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_job_post(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPost>>> {
    let post = state.services.admin().delete_job_post(&actor, id).await?;
    Ok(Json(ApiResponse::with_message(post, "Job post deleted")))
}

/// Views and application counts per post
#[utoipa::path(
    get,
    path = "/admin/reports/jobs",
    tag = "Admin",
    params(
        ("dateRange" = Option<String>, Query, description = "all, last30days, last6months or lastyear"),
        ("jobCategory" = Option<String>, Query, description = "Category ID or all"),
        ("jobType" = Option<String>, Query, description = "Job type ID or all"),
        ("status" = Option<String>, Query, description = "Post status or all")
    ),
    responses(
        (status = 200, description = "Per-post metrics, most applied first", body = JobAnalytics),
        (status = 400, description = "Unknown filter value")
    ),
    security(("bearer_auth" = []))
)]
pub async fn job_report(
    State(state): State<AppState>,
    Query(query): Query<JobReportQuery>,
) -> AppResult<Json<ApiResponse<JobAnalytics>>> {
    let filter = JobAnalyticsFilter::parse(
        query.date_range.as_deref(),
        query.job_category.as_deref(),
        query.job_type.as_deref(),
        query.status.as_deref(),
        Utc::now(),
    )?;
    let analytics = state.services.admin().job_analytics(filter).await?;
    Ok(Json(ApiResponse::success(analytics)))
}

#[utoipa::path(
    get,
    path = "/admin/reports/applications",
    tag = "Admin",
    params(
        ("dateRange" = Option<String>, Query, description = "all, last30days, last6months or lastyear"),
        ("status" = Option<String>, Query, description = "Application status or all"),
        ("searchTerm" = Option<String>, Query, description = "Applicant name or job title")
    ),
    responses(
        (status = 200, description = "Newest applications and totals", body = ApplicationReport),
        (status = 400, description = "Unknown filter value")
    ),
    security(("bearer_auth" = []))
)]
pub async fn application_report(
    State(state): State<AppState>,
    Query(query): Query<ApplicationReportQuery>,
) -> AppResult<Json<ApiResponse<ApplicationReport>>> {
    let filter = ApplicationReportFilter::parse(
        query.date_range.as_deref(),
        query.status.as_deref(),
        query.search_term.as_deref(),
        Utc::now(),
    )?;
    let report = state.services.admin().application_report(filter).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Change another admin's sign-in email
#[utoipa::path(
    patch,
    path = "/admin/users/admins/{id}/email",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Admin user ID")),
    request_body = AdminEmailChange,
    responses(
        (status = 200, description = "Email updated", body = UserResponse),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_admin_email(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminEmailChange>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .services
        .admin()
        .update_admin_email(&actor, id, payload.email)
        .await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Admin email updated",
    )))
}

#[utoipa::path(
    patch,
    path = "/admin/users/admins/{id}/password",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Admin user ID")),
    request_body = AdminPasswordChange,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Weak password"),
        (status = 404, description = "Admin not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_admin_password(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AdminPasswordChange>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .admin()
        .update_admin_password(&actor, id, payload.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Admin password updated")))
}
