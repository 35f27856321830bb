//! Email delivery.
//!
//! This module provides a thin abstraction over [lettre](https://lettre.rs)
//! with environment-based configuration. Every email is a single HTML part
//! sent from the configured sender to exactly one recipient.
//!
//! # Environment Variables
//!
//! [`MailerConfig`] is read by [`SmtpMailer::from_env`]:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | No | Port (default: 587) |
//! | `SMTP_USERNAME` | No | Username for authentication |
//! | `SMTP_PASSWORD` | No | Password for authentication |
//! | `SMTP_FROM` | Yes | Sender address |
//! | `SMTP_TLS` | No | `starttls` (default), `tls`, or `none` |
//! | `SMTP_TIMEOUT` | No | Connection timeout in seconds (default: 10) |

mod mailer;
mod memory;
mod message;

pub use mailer::{Mailer, MailerConfig, SmtpMailer};
pub use memory::{LogMailer, MemoryMailer};
pub use message::Email;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail config: {0}")]
    Config(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
