//! Outbound email.
//!
//! `QueuedMailer` pushes onto the apalis Postgres queue drained by
//! `jobs work`; `LogMailer` only logs and is used when the queue is disabled.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: EmailJob) -> AppResult<()>;
}

pub struct QueuedMailer {
    storage: PostgresStorage<EmailJob>,
}

impl QueuedMailer {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Mailer for QueuedMailer {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        let to = email.to.clone();
        storage
            .push(email)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;
        tracing::debug!(to = %to, "Email queued");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: EmailJob) -> AppResult<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email queue disabled, logging email instead of sending"
        );
        tracing::debug!(body = %email.body, "Email body");
        Ok(())
    }
}
