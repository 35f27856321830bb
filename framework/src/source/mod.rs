//! Where raw message payloads come from.
//!
//! - [`MessageSource`]: the only thing the [`Worker`](crate::worker::Worker)
//!   needs from a broker: the next payload, and a way to acknowledge it once
//!   its outcome is final.
//! - [`NatsSource`]: durable NATS JetStream pull consumer for production.
//! - [`LineSource`]: newline-delimited payloads from any async reader, e.g.
//!   stdin during local development.
//! - [`MemorySource`]: a fixed list of payloads for tests.

mod lines;
mod memory;
mod nats;

pub use lines::LineSource;
pub use memory::MemorySource;
pub use nats::NatsSource;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures talking to the message source.
///
/// Connect and receive failures end the worker loop; a failed ack is logged
/// and the loop moves on.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to connect to message source: {0}")]
    Connect(String),

    #[error("failed to receive message: {0}")]
    Receive(String),

    #[error("message source closed unexpectedly")]
    Closed,

    #[error("failed to acknowledge message: {0}")]
    Ack(String),
}

/// A sequence of raw payloads.
///
/// `next_message` suspends until a payload is available. It returns
/// `Ok(None)` only for finite sources that have been drained; broker-backed
/// sources report a lost subscription as [`SourceError`].
#[async_trait]
pub trait MessageSource: Send {
    async fn next_message(&mut self) -> Result<Option<Bytes>, SourceError>;

    /// Acknowledge the payload most recently returned by `next_message`.
    async fn ack(&mut self) -> Result<(), SourceError> {
        Ok(())
    }
}
