//! Public professionals directory.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::ProfessionalCard;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated, PaginationParams};

pub fn professional_routes() -> Router<AppState> {
    Router::new().route("/", get(list_professionals))
}

/// Job seekers who made their profile public
#[utoipa::path(
    get,
    path = "/professionals",
    tag = "Professionals",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (max 100)")
    ),
    responses((status = 200, description = "Public profiles, most complete first"))
)]
pub async fn list_professionals(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<ProfessionalCard>>>> {
    let professionals = state.services.profiles().professionals(page).await?;
    Ok(Json(ApiResponse::success(professionals)))
}
