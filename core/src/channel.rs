//! Event channel abstraction for publishing accepted orders.
//!
//! The channel is an external collaborator: the pipeline only needs a
//! "publish and wait for acknowledgment" capability, so this module
//! defines exactly that. Delivery is at-least-once — a submission whose
//! acknowledgment is lost may be resubmitted by the caller and arrive
//! twice downstream, so consumers must tolerate duplicate `order_id`s.
//!
//! # Implementations
//!
//! - `RecordingChannel` (in `orderstream-testing`) - for tests (fast, in-memory)
//! - `RedpandaChannel` (in `orderstream-redpanda`) - for connected mode
//!   (Kafka-compatible)
//!
//! # Example
//!
//! ```rust,ignore
//! use orderstream_core::channel::EventChannel;
//! use orderstream_core::event::ChannelRecord;
//!
//! async fn deliver(channel: &dyn EventChannel, record: &ChannelRecord) {
//!     match channel.publish("order-events", record).await {
//!         Ok(ack) => println!("delivered as {ack}"),
//!         Err(e) => eprintln!("delivery failed: {e}"),
//!     }
//! }
//! ```

use crate::event::{ChannelRecord, DeliveryAck};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during channel operations.
#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    /// Failed to connect to the channel at startup
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The remote rejected a delivery
    #[error("Delivery rejected for topic '{topic}': {reason}")]
    Rejected {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Network or transport error
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Delivery did not complete within the bounded wait
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    /// The record could not be encoded for transport
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// Trait for event channel implementations.
///
/// A channel accepts one flat [`ChannelRecord`] per accepted submission
/// and returns an opaque [`DeliveryAck`] once the record is durably
/// accepted downstream. The pipeline awaits this acknowledgment before it
/// touches the local history, so a failed delivery never appears in the
/// local mirror.
///
/// # Dyn Compatibility
///
/// `publish` returns an explicit `Pin<Box<dyn Future>>` instead of using
/// `async fn` so the pipeline can hold the channel as
/// `Arc<dyn EventChannel>`.
pub trait EventChannel: Send + Sync {
    /// Publish a record to a topic and wait for acknowledgment.
    ///
    /// # Arguments
    ///
    /// - `topic`: The topic to publish to (e.g., "order-events")
    /// - `record`: The flat wire record to publish
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] if the record cannot be encoded, the
    /// transport is unavailable, or the remote rejects the delivery. The
    /// caller imposes the bounded wait; implementations may additionally
    /// time out on their own.
    fn publish(
        &self,
        topic: &str,
        record: &ChannelRecord,
    ) -> Pin<Box<dyn Future<Output = Result<DeliveryAck, ChannelError>> + Send + '_>>;
}
