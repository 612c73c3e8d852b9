//! Bearer authentication and role gates.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Access, CurrentUser};
use crate::errors::AppError;

/// JWT authentication middleware.
///
/// Resolves the bearer token to a live account and injects the
/// `CurrentUser` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let current_user = state.services.auth().authenticate(&token).await?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Identify the caller when a usable bearer token is present and carry on
/// anonymously otherwise. For public routes whose answer depends on who asks.
pub async fn identify(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(&request) {
        match state.services.auth().authenticate(&token).await {
            Ok(current_user) => {
                request.extensions_mut().insert(current_user);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable bearer token"),
        }
    }
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Role gate for a route group. Runs after `auth_middleware`.
///
/// Mount with `middleware::from_fn_with_state(Access::Employer, authorize)`.
pub async fn authorize(
    State(access): State<Access>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if let Err(e) = user.authorize(access) {
        tracing::warn!(user_id = %user.id, role = %user.role, ?access, "Access denied");
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
