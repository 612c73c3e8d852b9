//! Application route configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, application_routes, auth_routes, catalog_routes, employer_routes, health,
    job_post_routes, jobseeker_routes, professional_routes, root,
};
use super::middleware::{auth_middleware, authorize, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, MAX_MULTIPART_BODY_BYTES, UPLOAD_URL_PREFIX};
use crate::domain::Access;

/// Create the application router with all routes configured
pub fn create_router(state: AppState, config: &Config) -> Router {
    let signed_in = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Everything but health, docs and auth (which picks its own limits)
    let api = Router::new()
        .nest(
            "/jobseeker",
            jobseeker_routes()
                .route_layer(middleware::from_fn_with_state(Access::JobSeeker, authorize))
                .route_layer(signed_in()),
        )
        .nest(
            "/employer",
            employer_routes()
                .route_layer(middleware::from_fn_with_state(Access::Employer, authorize))
                .route_layer(signed_in()),
        )
        .nest(
            "/admin",
            admin_routes()
                .route_layer(middleware::from_fn_with_state(Access::Admin, authorize))
                .route_layer(signed_in()),
        )
        .nest("/jobposts", job_post_routes(&state))
        .nest("/applications", application_routes(&state))
        .nest("/catalog", catalog_routes(&state))
        .nest("/professionals", professional_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes(&state))
        .merge(api)
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(&config.upload_dir))
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_MULTIPART_BODY_BYTES))
        .layer(cors(&config.client_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured client origin.
fn cors(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(client_url = %client_url, "Invalid client URL; CORS origin not set");
            layer
        }
    }
}
