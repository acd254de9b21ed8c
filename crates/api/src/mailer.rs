//! Contact notification delivery.
//!
//! Handlers deliver through the [`ContactNotifier`] trait. The production
//! implementation, [`ContactMailer`], wraps the `lettre` async SMTP
//! transport and sends two plain-text emails per validated contact
//! submission: a notification to the staff inbox and a confirmation to the
//! sender. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`MailConfig::from_env`] returns `None` and no
//! mailer is constructed.

use async_trait::async_trait;
use kvp_core::contact::ContactSubmission;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Delivery collaborator for validated contact submissions.
///
/// The handler only talks to this trait; [`ContactMailer`] is the SMTP
/// implementation.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), MailError>;
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@kvp.local";

/// Default staff inbox when `CONTACT_STAFF_ADDRESS` is not set.
const DEFAULT_STAFF_ADDRESS: &str = "staff@kvp.local";

/// Configuration for the SMTP contact mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Staff inbox that receives contact notifications.
    pub staff_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that mail
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable                | Required | Default            |
    /// |-------------------------|----------|--------------------|
    /// | `SMTP_HOST`             | yes      | —                  |
    /// | `SMTP_PORT`             | no       | `587`              |
    /// | `SMTP_FROM`             | no       | `noreply@kvp.local`|
    /// | `CONTACT_STAFF_ADDRESS` | no       | `staff@kvp.local`  |
    /// | `SMTP_USER`             | no       | —                  |
    /// | `SMTP_PASSWORD`         | no       | —                  |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            staff_address: std::env::var("CONTACT_STAFF_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_STAFF_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// ContactMailer
// ---------------------------------------------------------------------------

/// Sends contact-form notification emails via SMTP.
pub struct ContactMailer {
    config: MailConfig,
}

impl ContactMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactNotifier for ContactMailer {
    /// Deliver both messages for a validated submission: the staff
    /// notification first, then the confirmation to the sender.
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), MailError> {
        self.send(
            &self.config.staff_address,
            "[KVP] お問い合わせがありました",
            &staff_body(submission),
        )
        .await?;
        self.send(
            &submission.email,
            "[KVP] お問い合わせを受け付けました",
            &user_body(submission),
        )
        .await?;

        tracing::info!(from = %submission.email, "Contact notification emails sent");
        Ok(())
    }
}

fn staff_body(submission: &ContactSubmission) -> String {
    format!(
        "氏名: {} ({})\n所属: {}\nメール: {}\n\n{}",
        submission.name_kanji,
        submission.name_kana,
        submission.affiliation,
        submission.email,
        submission.body,
    )
}

fn user_body(submission: &ContactSubmission) -> String {
    format!(
        "{} 様\n\nお問い合わせを受け付けました。担当者より折り返しご連絡いたします。\n\n--- お問い合わせ内容 ---\n{}",
        submission.name_kanji, submission.body,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(MailConfig::from_env().is_none());
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn bodies_include_submission_fields() {
        let submission = ContactSubmission {
            name_kanji: "高専 花子".into(),
            name_kana: "こうせん はなこ".into(),
            email: "hanako@example.com".into(),
            affiliation: "明石工業高等専門学校".into(),
            body: "質問があります。".into(),
        };
        let staff = staff_body(&submission);
        assert!(staff.contains("高専 花子"));
        assert!(staff.contains("hanako@example.com"));
        let user = user_body(&submission);
        assert!(user.contains("高専 花子 様"));
        assert!(user.contains("質問があります。"));
    }
}
