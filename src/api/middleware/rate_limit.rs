//! Rate limiting middleware using Redis cache.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_EMAIL_REQUESTS,
    RATE_LIMIT_EMAIL_WINDOW_SECONDS, RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW_SECONDS,
};
use crate::errors::AppError;

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut response = AppError::RateLimited.into_response();
        let headers = response.headers_mut();
        headers.insert(RETRY_AFTER, HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
        response
    }
}

/// One fixed-window limit applied to a route group.
#[derive(Debug, Clone, Copy)]
struct Limit {
    scope: &'static str,
    max_requests: u64,
    window_seconds: u64,
}

const GENERAL: Limit = Limit {
    scope: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    window_seconds: RATE_LIMIT_WINDOW_SECONDS,
};

const AUTH: Limit = Limit {
    scope: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    window_seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
};

const EMAIL: Limit = Limit {
    scope: "email",
    max_requests: RATE_LIMIT_EMAIL_REQUESTS,
    window_seconds: RATE_LIMIT_EMAIL_WINDOW_SECONDS,
};

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // First hop is the original client
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

async fn enforce(
    state: AppState,
    limit: Limit,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_id = get_client_identifier(&request);
    let key = format!("{}:{}", limit.scope, client_id);

    let (count, allowed) = match state
        .rate_limiter
        .check(&key, limit.max_requests, limit.window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Fail closed: no counter, no request
            tracing::error!(error = %e, scope = limit.scope, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: limit.window_seconds,
            });
        }
    };

    if !allowed {
        tracing::warn!(
            client = %client_id,
            scope = limit.scope,
            count = count,
            "Rate limit exceeded"
        );
        return Err(RateLimitError {
            retry_after: limit.window_seconds,
        });
    }

    let mut response = next.run(request).await;

    let remaining = limit.max_requests.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit.max_requests));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

/// General rate limiting middleware.
/// Limits requests to RATE_LIMIT_REQUESTS per RATE_LIMIT_WINDOW_SECONDS.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(state, GENERAL, request, next).await
}

/// Stricter rate limiting for sign-in and password reset.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(state, AUTH, request, next).await
}

/// Endpoints that send email.
pub async fn rate_limit_email_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(state, EMAIL, request, next).await
}
