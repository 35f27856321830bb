use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;

use super::{MessageSource, SourceError};

/// In-memory [`MessageSource`] that yields a fixed list of payloads, then ends.
#[derive(Debug, Default)]
pub struct MemorySource {
    pending: VecDeque<Bytes>,
    acked: usize,
}

impl MemorySource {
    pub fn new<I, P>(payloads: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Bytes>,
    {
        Self {
            pending: payloads.into_iter().map(Into::into).collect(),
            acked: 0,
        }
    }

    /// Number of acknowledgements received.
    pub fn acked(&self) -> usize {
        self.acked
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl MessageSource for MemorySource {
    async fn next_message(&mut self) -> Result<Option<Bytes>, SourceError> {
        Ok(self.pending.pop_front())
    }

    async fn ack(&mut self) -> Result<(), SourceError> {
        self.acked += 1;
        Ok(())
    }
}
