use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Email, MailError, Mailer};

/// In-memory [`Mailer`] for development and testing.
///
/// Sent emails are kept in a `Vec` behind a mutex. Clones share the same
/// outbox.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<Email>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// [`Mailer`] that writes the email to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            recipient = %email.recipient,
            subject = %email.subject,
            bytes = email.html.len(),
            "dry run, email not sent"
        );
        tracing::debug!(html = %email.html, "dry run body");
        Ok(())
    }
}
