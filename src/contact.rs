use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::mailer::{EmailAddress, EmailMessage, Mailer};

pub const DEFAULT_SITE_NAME: &str = "Miausairovi Cattery";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub call_schedule: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Failed to send email")]
    Delivery(#[source] anyhow::Error),
}

impl ContactError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidEmail)
    }
}

/// Addresses used when dispatching contact emails.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub site_name: String,
    pub from_email: String,
    pub notify_email: String,
}

impl ContactSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        let from_email = required_env("MAILERSEND_FROM_EMAIL")?;
        let notify_email = required_env("MAILERSEND_TO_EMAIL")?;
        let site_name = std::env::var("CATTERY_SITE_NAME")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_owned());
        Ok(Self {
            site_name,
            from_email,
            notify_email,
        })
    }
}

fn required_env(key: &str) -> anyhow::Result<String> {
    let value = std::env::var(key).map_err(|_| anyhow::anyhow!("{key} is not set"))?;
    let value = value.trim().to_owned();
    if value.is_empty() {
        anyhow::bail!("{key} is empty");
    }
    Ok(value)
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(ContactError::MissingFields);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }

    /// Email to the business, replying straight to the requester.
    pub fn notification(
        &self,
        settings: &ContactSettings,
        received_at: DateTime<Utc>,
    ) -> EmailMessage {
        let name = self.name.trim();
        let email = self.email.trim();
        let text = format!(
            "New Contact Form Submission\n\
             \n\
             Name: {name}\n\
             Email: {email}\n\
             Phone: {phone}\n\
             Preferred Call Time: {call}\n\
             Received: {received}\n\
             \n\
             Message:\n\
             {message}\n\
             \n\
             ---\n\
             This email was sent from the {site} contact form.\n",
            phone = optional_or(self.phone.as_deref(), "Not provided"),
            call = optional_or(self.call_schedule.as_deref(), "Not specified"),
            received = received_at.to_rfc3339(),
            message = self.message.trim(),
            site = settings.site_name,
        );

        EmailMessage {
            from: EmailAddress::new(
                &settings.from_email,
                format!("{} Contact Form", settings.site_name),
            ),
            to: vec![EmailAddress::new(&settings.notify_email, &settings.site_name)],
            reply_to: Some(EmailAddress::new(email, name)),
            subject: format!("New Inquiry from {name}"),
            text,
        }
    }

    pub fn acknowledgement(&self, settings: &ContactSettings) -> EmailMessage {
        let name = self.name.trim();
        let site = &settings.site_name;
        let text = format!(
            "Thank you for your inquiry!\n\
             \n\
             Dear {name},\n\
             \n\
             We've received your message and truly appreciate you taking the time to contact us.\n\
             \n\
             We'll get back to you as soon as possible, usually within 24-48 hours.\n\
             \n\
             Best regards,\n\
             {site} Team\n"
        );

        EmailMessage {
            from: EmailAddress::new(&settings.from_email, site),
            to: vec![EmailAddress::new(self.email.trim(), name)],
            reply_to: None,
            subject: format!("Thank you for contacting {site}"),
            text,
        }
    }
}

/// Validates the submission and sends the notification, then the
/// acknowledgement. Stops at the first failed send.
pub async fn submit(
    mailer: &dyn Mailer,
    settings: &ContactSettings,
    submission: &ContactSubmission,
    received_at: DateTime<Utc>,
) -> Result<(), ContactError> {
    submission.validate()?;

    mailer
        .send(&submission.notification(settings, received_at))
        .await
        .map_err(ContactError::Delivery)?;
    mailer
        .send(&submission.acknowledgement(settings))
        .await
        .map_err(ContactError::Delivery)?;

    tracing::info!(notify = %settings.notify_email, "contact emails sent");
    Ok(())
}

fn optional_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
