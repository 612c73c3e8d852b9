//! Dependency health checks reported by `GET /health`.

use async_trait::async_trait;

use super::{Cache, Database};
use crate::errors::AppResult;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Key under which the check is reported
    fn name(&self) -> &'static str;

    async fn check(&self) -> AppResult<()>;
}

#[async_trait]
impl HealthCheck for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> AppResult<()> {
        Ok(self.ping().await?)
    }
}

#[async_trait]
impl HealthCheck for Cache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> AppResult<()> {
        self.ping().await
    }
}
