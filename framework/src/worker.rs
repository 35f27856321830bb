//! The consumer loop that turns command messages into emails.
//!
//! [`Worker::handle`] runs one payload through every stage (decode, validate,
//! resolve the command, render, send) and reports the outcome as a value.
//! [`Worker::run`] feeds it from a [`MessageSource`] forever, logging each
//! outcome and acknowledging the message before reading the next one. A bad
//! message never stops the loop; only losing the source does.

use std::fmt;
use std::future::Future;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::command::{CommandEnvelope, CommandKind};
use crate::mail::{Email, MailError, Mailer};
use crate::source::{MessageSource, SourceError};
use crate::template::{Renderer, TemplateError};

/// Why a single message was dropped.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("payload is not a JSON object: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unsupported command {0:?}")]
    UnsupportedCommand(String),

    #[error(transparent)]
    Render(#[from] TemplateError),

    #[error(transparent)]
    Dispatch(#[from] MailError),
}

/// Stable names for [`MessageError`] variants, used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MalformedPayload,
    InvalidPattern,
    InvalidData,
    UnsupportedCommand,
    RenderError,
    DispatchError,
}

impl MessageError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedPayload(_) => FailureKind::MalformedPayload,
            Self::InvalidPattern(_) => FailureKind::InvalidPattern,
            Self::InvalidData(_) => FailureKind::InvalidData,
            Self::UnsupportedCommand(_) => FailureKind::UnsupportedCommand,
            Self::Render(_) => FailureKind::RenderError,
            Self::Dispatch(_) => FailureKind::DispatchError,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedPayload => "MalformedPayload",
            Self::InvalidPattern => "InvalidPattern",
            Self::InvalidData => "InvalidData",
            Self::UnsupportedCommand => "UnsupportedCommand",
            Self::RenderError => "RenderError",
            Self::DispatchError => "DispatchError",
        };
        f.write_str(name)
    }
}

/// A message that resulted in a sent email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub command: CommandKind,
    pub recipient: String,
}

/// Sequential command processor.
///
/// ```ignore
/// let worker = Worker::new(FileRenderer::new("templates"), SmtpMailer::from_env()?);
/// let mut source = NatsSource::connect(&config).await?;
/// worker.run_until(&mut source, shutdown_signal()).await?;
/// ```
pub struct Worker<R, M> {
    renderer: R,
    mailer: M,
    log_payloads: bool,
}

impl<R: Renderer, M: Mailer> Worker<R, M> {
    pub fn new(renderer: R, mailer: M) -> Self {
        Self {
            renderer,
            mailer,
            log_payloads: false,
        }
    }

    /// Include raw payloads in receipt and failure log lines (default: off).
    pub fn log_payloads(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// Process one raw payload. Never panics on bad input; every outcome is
    /// either a delivery or a [`MessageError`].
    pub async fn handle(&self, payload: &[u8]) -> Result<Delivered, MessageError> {
        let envelope = CommandEnvelope::parse(payload)?;
        tracing::debug!(
            cmd = %envelope.pattern.cmd,
            template = %envelope.data.template_name,
            "command parsed"
        );

        let command = envelope.kind()?;
        let body = self
            .renderer
            .render(&envelope.data.template_name, &envelope.template_data())?;

        let email = Email::new(envelope.data.email, command.subject(), body);
        self.mailer.send(&email).await?;

        Ok(Delivered {
            command,
            recipient: email.recipient,
        })
    }

    /// Handle one payload and log its outcome.
    async fn process(&self, payload: &[u8]) {
        if self.log_payloads {
            tracing::debug!(payload = %String::from_utf8_lossy(payload), "message received");
        } else {
            tracing::debug!(bytes = payload.len(), "message received");
        }

        match self.handle(payload).await {
            Ok(delivered) => {
                tracing::info!(
                    command = %delivered.command,
                    recipient = %delivered.recipient,
                    "email sent"
                );
            }
            Err(e) if self.log_payloads => {
                tracing::warn!(
                    kind = %e.kind(),
                    error = %e,
                    payload = %String::from_utf8_lossy(payload),
                    "message dropped"
                );
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "message dropped");
            }
        }
    }

    /// Consume `source` until it is drained or fails.
    pub async fn run<S>(&self, source: &mut S) -> Result<(), SourceError>
    where
        S: MessageSource + ?Sized,
    {
        self.run_until(source, std::future::pending()).await
    }

    /// Consume `source` until it is drained, fails, or `shutdown` resolves.
    ///
    /// Shutdown is only observed while waiting for the next message, so a
    /// message that is already being processed is finished and acknowledged.
    pub async fn run_until<S, F>(&self, source: &mut S, shutdown: F) -> Result<(), SourceError>
    where
        S: MessageSource + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!("worker running");

        loop {
            let next = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, worker stopped");
                    return Ok(());
                }
                next = source.next_message() => next,
            };

            let payload = match next {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    tracing::info!("message source drained, worker stopped");
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!(error = %e, "message source failed");
                    return Err(e);
                }
            };

            let span = tracing::info_span!("message", message_id = %Uuid::new_v4());
            self.process(&payload).instrument(span).await;

            if let Err(e) = source.ack().await {
                tracing::warn!(error = %e, "failed to acknowledge message");
            }
        }
    }
}
