//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{
    auth_middleware, rate_limit_auth_middleware, rate_limit_email_middleware,
    rate_limit_middleware,
};
use crate::api::AppState;
use crate::domain::{CurrentUser, UserResponse};
use crate::errors::AppResult;
use crate::services::{EmployerSignup, JobSeekerSignup, SignIn};
use crate::types::ApiResponse;

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "nimal@uom.ac.lk")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Verification token is required"))]
    pub token: String,
}

/// Body of the endpoints that only need an address
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmailRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "nimal@uom.ac.lk")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    pub password: String,
}

/// Create authentication routes.
///
/// Sign-in and password reset share the strict limiter, endpoints that send
/// mail the email limiter, everything else the general one.
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let strict = || middleware::from_fn_with_state(state.clone(), rate_limit_auth_middleware);
    let email = || middleware::from_fn_with_state(state.clone(), rate_limit_email_middleware);
    let general = || middleware::from_fn_with_state(state.clone(), rate_limit_middleware);
    let signed_in = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route(
            "/signup/jobseeker",
            post(signup_job_seeker).route_layer(general()),
        )
        .route("/signup/employer", post(signup_employer).route_layer(general()))
        .route("/signin", post(signin).route_layer(strict()))
        .route("/reset-password", post(reset_password).route_layer(strict()))
        .route("/verify-email", post(verify_email).route_layer(general()))
        .route(
            "/resend-verification",
            post(resend_verification).route_layer(email()),
        )
        .route("/forgot-password", post(forgot_password).route_layer(email()))
        .route(
            "/me",
            get(me).route_layer(signed_in()).route_layer(general()),
        )
        .route(
            "/signout",
            post(signout).route_layer(signed_in()).route_layer(general()),
        )
}

/// Register a job seeker with a university email
#[utoipa::path(
    post,
    path = "/auth/signup/jobseeker",
    tag = "Authentication",
    request_body = JobSeekerSignup,
    responses(
        (status = 201, description = "Account created; verification email sent", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup_job_seeker(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<JobSeekerSignup>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.services.auth().signup_job_seeker(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            UserResponse::from(user),
            "Account created. Please check your email to verify your account.",
        )),
    ))
}

/// Register an employer
#[utoipa::path(
    post,
    path = "/auth/signup/employer",
    tag = "Authentication",
    request_body = EmployerSignup,
    responses(
        (status = 201, description = "Account created; verification email sent", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup_employer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmployerSignup>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.services.auth().signup_employer(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            UserResponse::from(user),
            "Account created. Please check your email to verify your account.",
        )),
    ))
}

/// Sign in and get a JWT token
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignIn),
        (status = 400, description = "Email not verified"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account inactive or suspended"),
        (status = 423, description = "Account locked after repeated failures"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<ApiResponse<SignIn>>> {
    let session = state
        .services
        .auth()
        .signin(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::success(session)))
}

/// Sign out. Tokens are stateless, so the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn signout(user: CurrentUser) -> Json<ApiResponse<()>> {
    tracing::info!(user_id = %user.id, "User signed out");
    Json(ApiResponse::message("Signed out successfully"))
}

/// Get the signed-in account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.auth().me(user.id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Confirm an email address with the token from the verification link
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    tag = "Authentication",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyEmailRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.auth().verify_email(payload.token).await?;
    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Email verified successfully",
    )))
}

/// Send a fresh verification link
#[utoipa::path(
    post,
    path = "/auth/resend-verification",
    tag = "Authentication",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Verification email sent if the account exists"),
        (status = 400, description = "Email already verified"),
        (status = 429, description = "Too many email requests")
    )
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .auth()
        .resend_verification(payload.email)
        .await?;
    Ok(Json(ApiResponse::message(
        "If an account exists for this email, a verification link has been sent",
    )))
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Authentication",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists"),
        (status = 429, description = "Too many email requests")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.auth().forgot_password(payload.email).await?;
    Ok(Json(ApiResponse::message(
        "If an account exists for this email, a reset link has been sent",
    )))
}

/// Choose a new password with the token from the reset link
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Invalid or expired token, or weak password")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .auth()
        .reset_password(payload.token, payload.password)
        .await?;
    Ok(Json(ApiResponse::message("Password has been reset successfully")))
}
