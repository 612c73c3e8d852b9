//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, authorize, identify};
pub use rate_limit::{
    rate_limit_auth_middleware, rate_limit_email_middleware, rate_limit_middleware,
    RateLimitError,
};
