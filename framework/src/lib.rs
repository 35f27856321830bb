//! Turns queued account commands into templated transactional emails.
//!
//! A [`Worker`] reads raw payloads from a [`source::MessageSource`], validates
//! them as [`command::CommandEnvelope`]s, renders the named template with a
//! [`template::Renderer`], and sends the result through a [`mail::Mailer`].

pub mod command;
pub mod config;
pub mod mail;
mod shutdown;
pub mod source;
pub mod template;
pub mod worker;

pub use crate::config::{EnvConfig, WorkerConfig};
pub use shutdown::shutdown_signal;
pub use worker::{Delivered, FailureKind, MessageError, Worker};
