//! Canonical events and their outbound wire form.
//!
//! An [`OrderEvent`] is built by the pipeline from a validated
//! [`Submission`](crate::submission::Submission) plus the ingestion
//! timestamp, and is immutable from then on. The channel and the history
//! each work from independent copies, so mutating one can never affect the
//! other.
//!
//! For delivery the event is flattened into a [`ChannelRecord`], a
//! transport-neutral structured record with a fixed key set, encoded as
//! JSON. The record's field names are part of the external contract and
//! must not change without coordinating with downstream consumers.

use crate::category::Category;
use crate::submission::Submission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Timestamp format used on the wire: ISO-8601-like and lexically sortable.
const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error types for event encoding and decoding.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize a record to bytes.
    #[error("Failed to serialize event: {0}")]
    SerializationError(String),

    /// Failed to deserialize a record from bytes.
    #[error("Failed to deserialize event: {0}")]
    DeserializationError(String),
}

/// A canonical, validated, timestamped order record.
///
/// Immutable once built: the pipeline owns it exclusively until copies are
/// handed to the channel and the history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Order identifier
    pub order_id: String,
    /// Product name
    pub product_name: String,
    /// Product category
    pub category: Category,
    /// Unit price, strictly positive
    pub price: f64,
    /// Quantity, at least one
    pub quantity: u32,
    /// Customer location
    pub customer_location: String,
    /// Ingestion timestamp, non-decreasing across events in submission order
    pub timestamp: DateTime<Utc>,
}

impl OrderEvent {
    /// Builds an event from a validated submission and an ingestion time.
    #[must_use]
    pub fn from_submission(submission: Submission, timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id: submission.order_id,
            product_name: submission.product_name,
            category: submission.category,
            price: submission.price,
            quantity: submission.quantity,
            customer_location: submission.customer_location,
            timestamp,
        }
    }
}

/// The flat outbound record published to the event channel.
///
/// Exactly these keys, in machine-readable form: `order_id`,
/// `product_name`, `category` (one of the fixed set), `price` (float),
/// `quantity` (integer), `customer_location`, and `timestamp` as a
/// sortable ISO-like string.
///
/// # Examples
///
/// ```
/// use orderstream_core::category::Category;
/// use orderstream_core::event::{ChannelRecord, OrderEvent};
/// use orderstream_core::submission::Submission;
/// use chrono::{TimeZone, Utc};
///
/// let event = OrderEvent::from_submission(
///     Submission {
///         order_id: "ORD-1234-567".to_string(),
///         product_name: "Wireless Mouse".to_string(),
///         category: Category::Electronics,
///         price: 19.99,
///         quantity: 2,
///         customer_location: "New York, USA".to_string(),
///     },
///     Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
/// );
/// let record = ChannelRecord::from(&event);
/// assert_eq!(record.timestamp, "2025-06-01T12:00:00Z");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Order identifier
    pub order_id: String,
    /// Product name
    pub product_name: String,
    /// Category name from the fixed set
    pub category: Category,
    /// Unit price as a floating value
    pub price: f64,
    /// Quantity as an integer
    pub quantity: u32,
    /// Customer location
    pub customer_location: String,
    /// Ingestion timestamp, ISO-8601-like and sortable
    pub timestamp: String,
}

impl ChannelRecord {
    /// Serialize this record to its JSON wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SerializationError`] if encoding fails, which
    /// should not happen for well-formed records.
    pub fn to_json(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    /// Deserialize a record from JSON wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::DeserializationError`] if the bytes are not a
    /// well-formed record (corrupted payload, unknown category, missing
    /// keys).
    pub fn from_json(bytes: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

impl From<&OrderEvent> for ChannelRecord {
    fn from(event: &OrderEvent) -> Self {
        Self {
            order_id: event.order_id.clone(),
            product_name: event.product_name.clone(),
            category: event.category,
            price: event.price,
            quantity: event.quantity,
            customer_location: event.customer_location.clone(),
            timestamp: event.timestamp.format(WIRE_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Opaque delivery acknowledgment returned by an event channel.
///
/// The pipeline treats a submission as accepted only once it holds one of
/// these. The contents identify the delivery to the channel (for the
/// Kafka-compatible channel, partition and offset) but carry no meaning
/// locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryAck(String);

impl DeliveryAck {
    /// Wraps a channel-assigned delivery identifier.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
