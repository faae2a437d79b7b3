use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Sign-off appended to every notification mail.
pub const MAIL_SIGN_OFF: &str = "Cheers,\nYour Lingua Server";

#[derive(Debug, Clone, PartialEq)]
pub enum EmailProviderType {
    SendGrid,
    Mock,
    None,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProviderType,
    pub sendgrid_api_key: Option<String>,
    pub from_address: String,
    pub feedback_address: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Notification mailer. Messages are plain text lines; composition stays
/// with the callers, this service only delivers.
pub struct Mailer {
    config: EmailConfig,
    client: reqwest::Client,
    last_send: RwLock<HashMap<String, i64>>,
}

#[derive(Serialize)]
struct SendGridPayload<'a> {
    personalizations: Vec<SendGridPersonalization<'a>>,
    from: SendGridAddress<'a>,
    subject: &'a str,
    content: Vec<SendGridContent<'a>>,
}

#[derive(Serialize)]
struct SendGridPersonalization<'a> {
    to: Vec<SendGridAddress<'a>>,
}

#[derive(Serialize)]
struct SendGridAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct SendGridContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl Mailer {
    pub fn from_env() -> Self {
        let provider = match env_string("EMAIL_PROVIDER").as_deref() {
            Some("sendgrid") => EmailProviderType::SendGrid,
            Some("mock") => EmailProviderType::Mock,
            _ => EmailProviderType::None,
        };

        let config = EmailConfig {
            provider,
            sendgrid_api_key: env_string("SENDGRID_API_KEY"),
            from_address: env_string("EMAIL_FROM")
                .unwrap_or_else(|| "noreply@lingua.app".into()),
            feedback_address: env_string("EMAIL_FEEDBACK_TO"),
        };

        Self::with_config(config)
    }

    pub fn with_config(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            last_send: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_available(&self) -> bool {
        match self.config.provider {
            EmailProviderType::SendGrid => self.config.sendgrid_api_key.is_some(),
            EmailProviderType::Mock => true,
            EmailProviderType::None => false,
        }
    }

    pub fn provider_type(&self) -> &EmailProviderType {
        &self.config.provider
    }

    /// Address that receives feedback notifications; falls back to the
    /// sender address when no dedicated inbox is configured.
    pub fn feedback_address(&self) -> &str {
        self.config
            .feedback_address
            .as_deref()
            .unwrap_or(&self.config.from_address)
    }

    /// True when `to` has not been mailed within the last `window_secs`.
    pub fn check_rate_limit(&self, to: &str, window_secs: i64) -> bool {
        let now = chrono::Utc::now().timestamp();
        let guard = self.last_send.read();
        match guard.get(to) {
            Some(&last) => now - last >= window_secs,
            None => true,
        }
    }

    pub fn record_send(&self, to: &str) {
        let now = chrono::Utc::now().timestamp();
        self.last_send.write().insert(to.to_string(), now);
    }

    /// Sends `lines` joined into a plain-text body.
    pub async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        lines: &[String],
    ) -> Result<(), EmailError> {
        let body = lines.join("\n");
        match self.config.provider {
            EmailProviderType::SendGrid => self.send_via_sendgrid(to, subject, &body).await,
            EmailProviderType::Mock => {
                tracing::debug!(%to, %subject, "mock mail send");
                Ok(())
            }
            EmailProviderType::None => Err(EmailError::NotConfigured("EMAIL_PROVIDER")),
        }
    }

    async fn send_via_sendgrid(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let api_key = self
            .config
            .sendgrid_api_key
            .as_deref()
            .ok_or(EmailError::NotConfigured("SENDGRID_API_KEY"))?;

        let payload = SendGridPayload {
            personalizations: vec![SendGridPersonalization {
                to: vec![SendGridAddress { email: to }],
            }],
            from: SendGridAddress {
                email: &self.config.from_address,
            },
            subject,
            content: vec![SendGridContent {
                content_type: "text/plain",
                value: body,
            }],
        };

        let resp = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmailError::HttpStatus { status, body });
        }

        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
