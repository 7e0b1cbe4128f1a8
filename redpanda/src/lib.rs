//! Kafka-compatible event channel for orderstream's connected mode.
//!
//! This crate provides a Redpanda/Kafka-backed implementation of the
//! [`EventChannel`] trait from `orderstream-core`, using rdkafka's
//! `FutureProducer`.
//!
//! # Delivery Semantics
//!
//! **At-least-once**: the pipeline treats a submission as accepted only
//! once the broker acknowledges the record, and never retries on its own.
//! A caller resubmitting after a lost acknowledgment can therefore
//! produce duplicate `order_id`s downstream; consumers must tolerate
//! them.
//!
//! Records are encoded as JSON (the wire contract fixes field names, so a
//! named encoding is required) and keyed by `order_id`, which keeps
//! resubmissions of the same order in one partition.
//!
//! # Startup
//!
//! Producer creation is validated eagerly in [`RedpandaChannelBuilder::build`]:
//! if the configuration is unusable the error surfaces at startup, so a
//! deployment either offers connected mode or refuses it up front rather
//! than failing on the first submission.
//!
//! # Example
//!
//! ```no_run
//! use orderstream_redpanda::RedpandaChannel;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Basic configuration
//! let channel = RedpandaChannel::new("localhost:9092")?;
//!
//! // Custom configuration
//! let channel = RedpandaChannel::builder()
//!     .brokers("localhost:9092,localhost:9093")
//!     .producer_acks("all")  // Wait for all replicas
//!     .compression("lz4")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use orderstream_core::channel::{ChannelError, EventChannel};
use orderstream_core::event::{ChannelRecord, DeliveryAck};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Redpanda/Kafka event channel implementation.
///
/// Publishes one JSON-encoded [`ChannelRecord`] per accepted submission
/// and reports the broker-assigned `partition@offset` as the opaque
/// [`DeliveryAck`].
pub struct RedpandaChannel {
    /// Kafka producer for publishing records
    producer: FutureProducer,
    /// Broker addresses, kept for diagnostics
    brokers: String,
    /// Producer send timeout
    timeout: Duration,
}

impl RedpandaChannel {
    /// Create a new channel with default configuration.
    ///
    /// # Parameters
    ///
    /// - `brokers`: Comma-separated list of broker addresses (e.g., "localhost:9092")
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ConnectionFailed`] if the producer cannot
    /// be created from the configuration.
    pub fn new(brokers: &str) -> Result<Self, ChannelError> {
        Self::builder().brokers(brokers).build()
    }

    /// Create a new builder for configuring the channel.
    #[must_use]
    pub fn builder() -> RedpandaChannelBuilder {
        RedpandaChannelBuilder::default()
    }

    /// Get a reference to the brokers string.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for configuring a [`RedpandaChannel`].
///
/// # Example
///
/// ```no_run
/// use orderstream_redpanda::RedpandaChannel;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let channel = RedpandaChannel::builder()
///     .brokers("localhost:9092")
///     .producer_acks("all")
///     .compression("lz4")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RedpandaChannelBuilder {
    brokers: Option<String>,
    producer_acks: Option<String>,
    compression: Option<String>,
    timeout: Option<Duration>,
}

impl RedpandaChannelBuilder {
    /// Set the broker addresses.
    ///
    /// # Parameters
    ///
    /// - `brokers`: Comma-separated list of broker addresses (e.g., "localhost:9092")
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set the producer acknowledgment mode.
    ///
    /// # Parameters
    ///
    /// - `acks`: "0" (no acks), "1" (leader ack), "all" (all replicas ack)
    ///
    /// Default: "1"
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set the compression codec.
    ///
    /// # Parameters
    ///
    /// - `compression`: "none", "gzip", "snappy", "lz4", "zstd"
    ///
    /// Default: "none"
    #[must_use]
    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    /// Set the producer send timeout.
    ///
    /// Default: 5 seconds
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the [`RedpandaChannel`].
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ConnectionFailed`] if:
    /// - Brokers not set
    /// - Cannot create producer
    /// - Invalid configuration
    pub fn build(self) -> Result<RedpandaChannel, ChannelError> {
        let brokers = self
            .brokers
            .ok_or_else(|| ChannelError::ConnectionFailed("Brokers not configured".to_string()))?;

        let mut producer_config = ClientConfig::new();
        producer_config
            .set("bootstrap.servers", &brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", self.producer_acks.as_deref().unwrap_or("1"))
            .set(
                "compression.type",
                self.compression.as_deref().unwrap_or("none"),
            );

        let producer: FutureProducer = producer_config.create().map_err(|e| {
            ChannelError::ConnectionFailed(format!("Failed to create producer: {e}"))
        })?;

        tracing::info!(
            brokers = %brokers,
            acks = self.producer_acks.as_deref().unwrap_or("1"),
            compression = self.compression.as_deref().unwrap_or("none"),
            "RedpandaChannel created successfully"
        );

        Ok(RedpandaChannel {
            producer,
            brokers,
            timeout: self.timeout.unwrap_or(Duration::from_secs(5)),
        })
    }
}

impl EventChannel for RedpandaChannel {
    fn publish(
        &self,
        topic: &str,
        record: &ChannelRecord,
    ) -> Pin<Box<dyn Future<Output = Result<DeliveryAck, ChannelError>> + Send + '_>> {
        // Clone data before moving into async block
        let topic = topic.to_string();
        let record = record.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let payload = record
                .to_json()
                .map_err(|e| ChannelError::SerializationFailed(e.to_string()))?;

            // Key by order identifier: resubmissions of the same order
            // land in the same partition and keep their relative order.
            let key = record.order_id.as_bytes();

            let kafka_record = FutureRecord::to(&topic).payload(&payload).key(key);

            let send_result = self
                .producer
                .send(kafka_record, Timeout::After(timeout))
                .await;

            match send_result {
                Ok((partition, offset)) => {
                    tracing::debug!(
                        topic = %topic,
                        partition = partition,
                        offset = offset,
                        order_id = %record.order_id,
                        "Record published successfully"
                    );
                    Ok(DeliveryAck::new(format!("{partition}@{offset}")))
                },
                Err((kafka_error, _)) => {
                    tracing::error!(
                        topic = %topic,
                        error = %kafka_error,
                        "Failed to publish record"
                    );
                    Err(ChannelError::Rejected {
                        topic,
                        reason: kafka_error.to_string(),
                    })
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redpanda_channel_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedpandaChannel>();
        assert_sync::<RedpandaChannel>();
    }

    #[test]
    fn builder_requires_brokers() {
        let err = RedpandaChannel::builder().build().err();
        assert!(matches!(err, Some(ChannelError::ConnectionFailed(_))));
    }
}
