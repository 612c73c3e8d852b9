//! Email background job.
//!
//! Account emails are queued by the API and delivered by `jobs work`.
//! Bodies are plain text; delivery is logged with structured fields.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Sender address
    pub from: String,
}

/// Builds the account emails from configured addresses and the client URL.
#[derive(Debug, Clone)]
pub struct EmailComposer {
    from: String,
    client_url: String,
    support_email: String,
}

impl EmailComposer {
    pub fn new(
        from: impl Into<String>,
        client_url: impl Into<String>,
        support_email: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            client_url: client_url.into().trim_end_matches('/').to_string(),
            support_email: support_email.into(),
        }
    }

    fn job(&self, to: &str, subject: &str, body: String) -> EmailJob {
        EmailJob {
            to: to.to_string(),
            subject: subject.to_string(),
            body,
            from: self.from.clone(),
        }
    }

    pub fn verification(&self, to: &str, name: &str, token: &str) -> EmailJob {
        let url = format!(
            "{}/auth/verify-email?token={}&email={}",
            self.client_url,
            token,
            encode_query(to)
        );
        self.job(
            to,
            "Verify Your SkillBridge Account",
            format!(
                "Hi {},\n\nPlease confirm your email address to activate your SkillBridge account:\n\n{}\n\nThis link expires in 24 hours.",
                name, url
            ),
        )
    }

    pub fn password_reset(&self, to: &str, name: &str, token: &str) -> EmailJob {
        let url = format!("{}/auth/reset-password?token={}", self.client_url, token);
        self.job(
            to,
            "Reset Your SkillBridge Password",
            format!(
                "Hi {},\n\nUse the link below to choose a new password:\n\n{}\n\nThis link expires in 15 minutes. If you did not ask for a reset, ignore this email.",
                name, url
            ),
        )
    }

    pub fn welcome(&self, to: &str, name: &str, dashboard: &str) -> EmailJob {
        self.job(
            to,
            "Welcome to SkillBridge!",
            format!(
                "Hi {},\n\nYour email is verified. Sign in at {}/signin and head to {}{} to get started.",
                name, self.client_url, self.client_url, dashboard
            ),
        )
    }

    pub fn suspension(&self, to: &str, name: &str, reason: &str) -> EmailJob {
        self.job(
            to,
            "Account Suspended - SkillBridge",
            format!(
                "Hi {},\n\nYour SkillBridge account has been suspended.\nReason: {}\n\nContact {} if you believe this is a mistake.",
                name, reason, self.support_email
            ),
        )
    }
}

/// Percent-encode a query parameter value.
fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    tracing::info!(
        to = %job.to,
        from = %job.from,
        subject = %job.subject,
        "Processing email job"
    );
    tracing::debug!(body = %job.body, "Email body");

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> EmailComposer {
        EmailComposer::new("no-reply@skillbridge.lk", "http://localhost:5173/", "support@skillbridge.lk")
    }

    #[test]
    fn test_verification_link_carries_token_and_encoded_email() {
        let job = composer().verification("nimal+test@uom.ac.lk", "Nimal Perera", "abc123");
        assert_eq!(job.subject, "Verify Your SkillBridge Account");
        assert!(job
            .body
            .contains("http://localhost:5173/auth/verify-email?token=abc123&email=nimal%2Btest%40uom.ac.lk"));
        assert_eq!(job.from, "no-reply@skillbridge.lk");
    }

    #[test]
    fn test_suspension_mentions_support() {
        let job = composer().suspension("a@b.lk", "Kamal", "Policy violation");
        assert!(job.body.contains("support@skillbridge.lk"));
        assert!(job.body.contains("Policy violation"));
    }

    #[tokio::test]
    async fn test_handler_accepts_job() {
        let job = composer().password_reset("a@b.lk", "Kamal", "t0k3n");
        assert!(email_job_handler(job).await.is_ok());
    }
}
