use async_nats::jetstream::{self, consumer::pull, consumer::AckPolicy, stream};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use super::{MessageSource, SourceError};
use crate::config::WorkerConfig;

/// NATS JetStream durable pull consumer.
///
/// The stream and consumer are created on first connect if they do not exist.
/// Messages are fetched one at a time and acknowledged explicitly once the
/// worker has finished with them, so a crash mid-message leads to redelivery
/// after the ack wait expires.
pub struct NatsSource {
    messages: pull::Stream,
    pending: Option<jetstream::Message>,
}

impl NatsSource {
    pub async fn connect(config: &WorkerConfig) -> Result<Self, SourceError> {
        let client = async_nats::connect(&config.queue_url)
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?;
        tracing::info!(url = %config.queue_url, "connected to NATS");

        let jetstream = jetstream::new(client);

        let stream = jetstream
            .get_or_create_stream(stream::Config {
                name: config.queue_name.clone(),
                subjects: vec![config.queue_name.clone()],
                ..Default::default()
            })
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?;

        let consumer = stream
            .get_or_create_consumer(
                &config.queue_consumer,
                pull::Config {
                    durable_name: Some(config.queue_consumer.clone()),
                    ack_policy: AckPolicy::Explicit,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?;

        let messages = consumer
            .stream()
            .max_messages_per_batch(1)
            .messages()
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?;

        tracing::info!(
            stream = %config.queue_name,
            consumer = %config.queue_consumer,
            "consumer ready"
        );

        Ok(Self {
            messages,
            pending: None,
        })
    }
}

#[async_trait]
impl MessageSource for NatsSource {
    async fn next_message(&mut self) -> Result<Option<Bytes>, SourceError> {
        match self.messages.next().await {
            Some(Ok(message)) => {
                let payload = message.payload.clone();
                self.pending = Some(message);
                Ok(Some(payload))
            }
            Some(Err(e)) => Err(SourceError::Receive(e.to_string())),
            None => Err(SourceError::Closed),
        }
    }

    async fn ack(&mut self) -> Result<(), SourceError> {
        match self.pending.take() {
            Some(message) => message
                .ack()
                .await
                .map_err(|e| SourceError::Ack(e.to_string())),
            None => Ok(()),
        }
    }
}
