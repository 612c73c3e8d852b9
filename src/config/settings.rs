//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_CLIENT_URL, DEFAULT_DATABASE_URL, DEFAULT_FROM_EMAIL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_RECOMMENDER_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SUPPORT_EMAIL, DEFAULT_UPLOAD_DIR, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Frontend origin, used for CORS and for links in emails
    pub client_url: String,
    pub from_email: String,
    pub support_email: String,
    pub upload_dir: String,
    pub recommender_url: String,
    /// Queue emails through apalis instead of logging them in-process
    pub email_queue_enabled: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("client_url", &self.client_url)
            .field("from_email", &self.from_email)
            .field("upload_dir", &self.upload_dir)
            .field("recommender_url", &self.recommender_url)
            .field("email_queue_enabled", &self.email_queue_enabled)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            client_url: env::var("CLIENT_URL").unwrap_or_else(|_| DEFAULT_CLIENT_URL.to_string()),
            from_email: env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            support_email: env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_SUPPORT_EMAIL.to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            recommender_url: env::var("AI_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_RECOMMENDER_URL.to_string()),
            email_queue_enabled: env::var("EMAIL_QUEUE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Configuration for tests and tooling that never touches the environment.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            client_url: DEFAULT_CLIENT_URL.to_string(),
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
            recommender_url: DEFAULT_RECOMMENDER_URL.to_string(),
            email_queue_enabled: false,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
