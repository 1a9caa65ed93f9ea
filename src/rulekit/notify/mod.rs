// SPDX-License-Identifier: MIT

//! Approver notifications
//!
//! Outbound email is an external capability behind [`EmailSender`]. The
//! [`Notifier`] renders a template, fills in the default sender address
//! and hands the message to whichever sender it was built with.

pub mod http;
pub mod templates;

pub use http::HttpEmailSender;
pub use templates::EmailTemplates;

use crate::engine::error::EmailError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability to deliver one HTML email
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailError>;
}

/// Renders templates and sends them through an [`EmailSender`]
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    default_from: String,
    templates: EmailTemplates,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, default_from: impl Into<String>) -> Self {
        Self {
            sender,
            default_from: default_from.into(),
            templates: EmailTemplates::default(),
        }
    }

    pub fn with_templates(mut self, templates: EmailTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn templates(&self) -> &EmailTemplates {
        &self.templates
    }

    /// Fill a named-placeholder template and send it.
    ///
    /// A blank `from` falls back to the default sender address.
    pub async fn send_templated(
        &self,
        from: Option<&str>,
        to: &str,
        subject: &str,
        template_id: usize,
        values: &HashMap<String, String>,
    ) -> Result<(), EmailError> {
        let from = self.resolve_addresses(from, to)?;
        let body = self.templates.fill_named(template_id, values)?;
        log::info!("Sending template {} to {}", template_id, to);
        self.sender.send(from, to, subject, &body).await
    }

    /// Format a positional template with `values` in order and send it
    pub async fn send_positional(
        &self,
        from: Option<&str>,
        to: &str,
        subject: &str,
        template_id: usize,
        values: &[String],
    ) -> Result<(), EmailError> {
        let from = self.resolve_addresses(from, to)?;
        let body = self.templates.format_positional(template_id, values)?;
        log::info!("Sending positional template {} to {}", template_id, to);
        self.sender.send(from, to, subject, &body).await
    }

    fn resolve_addresses<'a>(
        &'a self,
        from: Option<&'a str>,
        to: &str,
    ) -> Result<&'a str, EmailError> {
        let from = match from.map(str::trim) {
            Some(addr) if !addr.is_empty() => addr,
            _ => self.default_from.as_str(),
        };
        if from.trim().is_empty() {
            return Err(EmailError::MissingAddress("sender"));
        }
        if to.trim().is_empty() {
            return Err(EmailError::MissingAddress("recipient"));
        }
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every message instead of sending it
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String, String, String)>>,
    }

    #[async_trait]
    impl EmailSender for RecordingSender {
        async fn send(
            &self,
            from: &str,
            to: &str,
            subject: &str,
            html_body: &str,
        ) -> Result<(), EmailError> {
            self.sent.lock().await.push((
                from.to_string(),
                to.to_string(),
                subject.to_string(),
                html_body.to_string(),
            ));
            Ok(())
        }
    }

    fn values() -> HashMap<String, String> {
        HashMap::from([("firstName".to_string(), "Ada".to_string())])
    }

    #[tokio::test]
    async fn test_default_from_used_when_blank() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = Notifier::new(sender.clone(), "noreply@example.com");

        notifier
            .send_templated(Some("  "), "ada@example.com", "Received", 2, &values())
            .await
            .unwrap();
        notifier
            .send_templated(
                Some("ops@example.com"),
                "ada@example.com",
                "Received",
                2,
                &values(),
            )
            .await
            .unwrap();

        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "noreply@example.com");
        assert_eq!(sent[1].0, "ops@example.com");
        assert_eq!(sent[0].2, "Received");
        assert!(sent[0].3.contains("Hi Ada,"));
    }

    #[tokio::test]
    async fn test_template_error_sends_nothing() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = Notifier::new(sender.clone(), "noreply@example.com");

        let result = notifier
            .send_templated(None, "ada@example.com", "Welcome", 0, &values())
            .await;
        assert!(matches!(result, Err(EmailError::UnresolvedPlaceholder { .. })));
        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_positional() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = Notifier::new(sender.clone(), "noreply@example.com");

        notifier
            .send_positional(
                None,
                "ada@example.com",
                "Shipped",
                1,
                &["Ada".to_string(), "42".to_string()],
            )
            .await
            .unwrap();

        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "noreply@example.com");
        assert_eq!(
            sent[0].3,
            "<html><body><h1>Dear Ada,</h1><p>Your order #42 has been shipped.</p></body></html>"
        );
    }

    #[tokio::test]
    async fn test_send_positional_count_mismatch_sends_nothing() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = Notifier::new(sender.clone(), "noreply@example.com");

        let result = notifier
            .send_positional(None, "ada@example.com", "Hi", 0, &["Ada".to_string()])
            .await;
        assert!(matches!(
            result,
            Err(EmailError::PlaceholderCount {
                template_id: 0,
                expected: 2,
                provided: 1
            })
        ));
        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_addresses() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = Notifier::new(sender.clone(), "");

        let result = notifier
            .send_templated(None, "ada@example.com", "Hi", 2, &values())
            .await;
        assert!(matches!(result, Err(EmailError::MissingAddress("sender"))));

        let notifier = Notifier::new(sender.clone(), "noreply@example.com");
        let result = notifier.send_templated(None, " ", "Hi", 2, &values()).await;
        assert!(matches!(result, Err(EmailError::MissingAddress("recipient"))));
        assert!(sender.sent.lock().await.is_empty());
    }
}
