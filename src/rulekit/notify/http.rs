// SPDX-License-Identifier: MIT

//! Transactional email over HTTP

use super::EmailSender;
use crate::engine::error::{EmailError, RulekitError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::env;

#[derive(Debug, Serialize)]
struct EmailRecipient<'a> {
    address: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailContent<'a> {
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailMessage<'a> {
    sender_address: &'a str,
    recipients: Vec<EmailRecipient<'a>>,
    content: EmailContent<'a>,
}

/// Sends mail by POSTing JSON to a transactional email API
#[derive(Clone)]
pub struct HttpEmailSender {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpEmailSender {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self, RulekitError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            RulekitError::config(format!("invalid email endpoint '{}': {}", endpoint, e))
        })?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Build from `EMAIL_API_URL` and `EMAIL_API_KEY`
    pub fn from_env() -> Result<Self, RulekitError> {
        let endpoint = env::var("EMAIL_API_URL")
            .map_err(|_| RulekitError::config("EMAIL_API_URL must be set"))?;
        let api_key = env::var("EMAIL_API_KEY")
            .map_err(|_| RulekitError::config("EMAIL_API_KEY must be set"))?;

        log::info!("Email sender: endpoint={}", endpoint);
        Self::new(&endpoint, api_key)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let message = EmailMessage {
            sender_address: from,
            recipients: vec![EmailRecipient { address: to }],
            content: EmailContent {
                subject,
                html: html_body,
            },
        };

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            log::warn!("Email to {} rejected: {} {}", to, status, message);
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        log::debug!("Email to {} accepted ({})", to, status);
        Ok(())
    }
}
