use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::Serialize;

pub const DEFAULT_MAILERSEND_BASE_URL: &str = "https://api.mailersend.com/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

/// A plain-text transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<EmailAddress>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct MailerSendConfig {
    pub api_key: String,
    pub base_url: String,
}

impl MailerSendConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("MAILERSEND_API_KEY")
            .map_err(|_| anyhow::anyhow!("MAILERSEND_API_KEY is not set"))?;
        let api_key = api_key.trim().to_owned();
        if api_key.is_empty() {
            anyhow::bail!("MAILERSEND_API_KEY is empty");
        }
        let base_url = std::env::var("MAILERSEND_BASE_URL")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MAILERSEND_BASE_URL.to_owned());
        Ok(Self { api_key, base_url })
    }
}

pub fn email_endpoint(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/email")
}

#[derive(Debug, Clone)]
pub struct MailerSendClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl MailerSendClient {
    pub fn new(config: MailerSendConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: email_endpoint(&config.base_url),
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl Mailer for MailerSendClient {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, subject = %message.subject, "email accepted");
            return Ok(());
        }

        let raw = response
            .text()
            .await
            .context("read MailerSend response body")?;
        let detail = parse_error_message(&raw).unwrap_or(raw);
        anyhow::bail!("MailerSend API error ({status}): {detail}");
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("message")?.as_str()?.to_owned();
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            email_endpoint("https://api.mailersend.com/v1/"),
            "https://api.mailersend.com/v1/email"
        );
        assert_eq!(email_endpoint("http://127.0.0.1:9/v1"), "http://127.0.0.1:9/v1/email");
    }

    #[test]
    fn message_serializes_to_mailersend_shape() -> anyhow::Result<()> {
        let message = EmailMessage {
            from: EmailAddress::new("site@example.com", "Contact Form"),
            to: vec![EmailAddress {
                email: "owner@example.com".to_owned(),
                name: None,
            }],
            reply_to: None,
            subject: "Hi".to_owned(),
            text: "Body".to_owned(),
        };

        let value = serde_json::to_value(&message)?;
        assert_eq!(
            value,
            serde_json::json!({
                "from": { "email": "site@example.com", "name": "Contact Form" },
                "to": [{ "email": "owner@example.com" }],
                "subject": "Hi",
                "text": "Body",
            })
        );
        Ok(())
    }

    #[test]
    fn extracts_api_error_message() {
        assert_eq!(
            parse_error_message(r#"{"message":"The from.email must be verified.","errors":{}}"#)
                .as_deref(),
            Some("The from.email must be verified.")
        );
        assert_eq!(parse_error_message("not json"), None);
    }
}
