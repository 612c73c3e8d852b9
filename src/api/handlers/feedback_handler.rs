//! Candidate feedback handlers, mounted under both `/employer` and `/jobseeker`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentUser, Feedback, FeedbackView, NewFeedback};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Rate a candidate
#[utoipa::path(
    post,
    path = "/employer/candidate-feedback",
    tag = "Feedback",
    request_body = NewFeedback,
    responses(
        (status = 201, description = "Feedback added", body = Feedback),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Job seeker not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewFeedback>,
) -> AppResult<(StatusCode, Json<ApiResponse<Feedback>>)> {
    let feedback = state.services.feedback().create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(feedback, "Feedback added successfully")),
    ))
}

/// Feedback the company wrote
#[utoipa::path(
    get,
    operation_id = "employer_list_feedbacks",
    path = "/employer/feedbacks",
    tag = "Feedback",
    responses((status = 200, description = "Newest first", body = [FeedbackView])),
    security(("bearer_auth" = []))
)]
pub async fn list_written(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<FeedbackView>>>> {
    list(state, user).await
}

/// Feedback employers wrote about the caller
#[utoipa::path(
    get,
    operation_id = "jobseeker_list_feedbacks",
    path = "/jobseeker/feedbacks",
    tag = "Feedback",
    responses((status = 200, description = "Newest first", body = [FeedbackView])),
    security(("bearer_auth" = []))
)]
pub async fn list_received(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<FeedbackView>>>> {
    list(state, user).await
}

#[utoipa::path(
    get,
    operation_id = "employer_get_feedback",
    path = "/employer/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback", body = FeedbackView),
        (status = 404, description = "Not found or written by another company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_written(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FeedbackView>>> {
    get(state, user, id).await
}

#[utoipa::path(
    get,
    operation_id = "jobseeker_get_feedback",
    path = "/jobseeker/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback", body = FeedbackView),
        (status = 404, description = "Not found or about another candidate")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_received(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FeedbackView>>> {
    get(state, user, id).await
}

async fn list(state: AppState, user: CurrentUser) -> AppResult<Json<ApiResponse<Vec<FeedbackView>>>> {
    let feedbacks = state.services.feedback().list(&user).await?;
    Ok(Json(ApiResponse::success(feedbacks)))
}

async fn get(
    state: AppState,
    user: CurrentUser,
    id: Uuid,
) -> AppResult<Json<ApiResponse<FeedbackView>>> {
    let feedback = state.services.feedback().get(&user, id).await?;
    Ok(Json(ApiResponse::with_message(
        feedback,
        "Feedback details fetched successfully",
    )))
}
