//! Outgoing mail
//!
//! Mails are posted as JSON to a transactional-mail relay. Without a relay
//! endpoint configured they are written to the log instead.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// An HTML mail ready to send
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, message: MailMessage) -> AppResult<()>;
}

/// Mail relay client
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String, from_address: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_html(&self, message: MailMessage) -> AppResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&RelayRequest {
                from: &self.from_address,
                to: &message.to,
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mail relay request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Mail relay error: {} - {}",
                status, body
            )));
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Mail sent");
        Ok(())
    }
}

/// Writes mails to the log; used in development
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_html(&self, message: MailMessage) -> AppResult<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.html,
            "Mail relay not configured, logging mail instead"
        );
        Ok(())
    }
}

/// Pick the mailer matching the configuration
pub fn from_config(config: &MailConfig) -> std::sync::Arc<dyn Mailer> {
    match &config.api_endpoint {
        Some(endpoint) if !endpoint.is_empty() => std::sync::Arc::new(HttpMailer::new(
            endpoint.clone(),
            config.api_key.clone(),
            config.from_address.clone(),
        )),
        _ => std::sync::Arc::new(LogMailer),
    }
}
