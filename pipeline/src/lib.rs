//! # Orderstream Pipeline
//!
//! The stateful submission engine: validation, canonical event
//! construction, at-least-once delivery to an event channel, and the
//! local append-only history.
//!
//! ## Control flow
//!
//! ```text
//! caller ──▶ validate ──▶ timestamp ──▶ build event ──▶ publish ──▶ append ──▶ History
//!               │                                          │
//!               └── ValidationError                        └── ChannelError
//!                   (no state change)                          (no state change)
//! ```
//!
//! The history is only appended to after the channel has acknowledged the
//! delivery, so the local mirror never shows an event that was not
//! actually ingested downstream. In local-only mode (no channel
//! configured) the publish step is a successful no-op.
//!
//! ## Example
//!
//! ```
//! use orderstream_core::category::Category;
//! use orderstream_core::submission::SubmissionForm;
//! use orderstream_pipeline::Pipeline;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pipeline = Pipeline::builder().build();
//!
//! let history = pipeline
//!     .submit(
//!         SubmissionForm::new()
//!             .order_id("ORD-1234-567")
//!             .product_name("Wireless Mouse")
//!             .category(Category::Electronics)
//!             .price(19.99)
//!             .quantity(2.0)
//!             .customer_location("New York, USA"),
//!     )
//!     .await
//!     .expect("valid submission in local-only mode");
//!
//! assert_eq!(history.len(), 1);
//! # }
//! ```

use chrono::{DateTime, Utc};
use orderstream_core::channel::{ChannelError, EventChannel};
use orderstream_core::clock::{Clock, SystemClock};
use orderstream_core::event::{ChannelRecord, OrderEvent};
use orderstream_core::history::{History, HistoryRow};
use orderstream_core::submission::{SubmissionForm, ValidationError, generate_order_id, validate};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Default topic accepted submissions are published to.
pub const DEFAULT_TOPIC: &str = "order-events";

/// Default bounded wait for channel acknowledgment.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors surfaced by [`Pipeline::submit`].
///
/// Neither kind mutates the history; a failed submission must simply be
/// resubmitted by the caller.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The submission was rejected before any side effect
    #[error("Submission rejected: {0}")]
    Validation(#[from] ValidationError),

    /// Delivery to the event channel failed; nothing was recorded locally
    #[error("Delivery failed: {0}")]
    Channel(#[from] ChannelError),
}

/// Mutable pipeline state, guarded by a single lock.
///
/// The watermark enforces non-decreasing ingestion timestamps even if the
/// wall clock steps backwards between submissions.
struct PipelineState {
    history: History,
    watermark: DateTime<Utc>,
    last_error: Option<String>,
}

/// The submission pipeline.
///
/// Owns the process-local history for the lifetime of the application
/// session and exposes it only through the values returned by [`submit`]
/// and [`clear`]. All mutation happens inside one exclusive critical
/// section, and channel delivery is awaited to completion inside that
/// section, so concurrent submissions cannot interleave or lose an entry
/// and no append ever happens speculatively.
///
/// [`submit`]: Pipeline::submit
/// [`clear`]: Pipeline::clear
pub struct Pipeline {
    state: Mutex<PipelineState>,
    clock: Arc<dyn Clock>,
    channel: Option<Arc<dyn EventChannel>>,
    topic: String,
    delivery_timeout: Duration,
}

impl Pipeline {
    /// Creates a builder with local-only defaults.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Whether a channel is configured (connected mode).
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Validates and ingests one submission, returning the full updated
    /// history.
    ///
    /// A form without an order identifier gets a generated one before
    /// validation. Steps: validate, capture a non-decreasing ingestion
    /// timestamp, build the canonical event, publish and await the
    /// acknowledgment (connected mode only, bounded by the configured
    /// timeout), then append the display row.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] for an invalid form and
    /// [`SubmitError::Channel`] when delivery fails or times out. In both
    /// cases the history is untouched.
    pub async fn submit(&self, form: SubmissionForm) -> Result<History, SubmitError> {
        let form = if form.order_id.is_none() {
            form.order_id(generate_order_id())
        } else {
            form
        };

        let submission = match validate(&form) {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!(error = %e, "Submission rejected");
                self.state.lock().await.last_error = Some(e.to_string());
                return Err(e.into());
            },
        };

        let mut state = self.state.lock().await;

        // Logical ingestion time: never behind an already accepted event.
        let timestamp = self.clock.now().max(state.watermark);
        let event = OrderEvent::from_submission(submission, timestamp);

        if let Some(channel) = &self.channel {
            let record = ChannelRecord::from(&event);
            if let Err(e) = self.deliver(channel.as_ref(), &record).await {
                tracing::error!(
                    order_id = %event.order_id,
                    topic = %self.topic,
                    error = %e,
                    "Delivery failed; history not updated"
                );
                state.last_error = Some(e.to_string());
                return Err(e.into());
            }
        }

        state.watermark = timestamp;
        state.history.push(HistoryRow::from_event(&event));
        state.last_error = None;

        tracing::info!(
            order_id = %event.order_id,
            category = %event.category,
            connected = self.channel.is_some(),
            rows = state.history.len(),
            "Submission accepted"
        );

        Ok(state.history.clone())
    }

    /// Publish with a bounded wait for the acknowledgment.
    async fn deliver(
        &self,
        channel: &dyn EventChannel,
        record: &ChannelRecord,
    ) -> Result<(), ChannelError> {
        let ack = tokio::time::timeout(self.delivery_timeout, channel.publish(&self.topic, record))
            .await
            .map_err(|_| ChannelError::Timeout(self.delivery_timeout))??;

        tracing::debug!(
            order_id = %record.order_id,
            topic = %self.topic,
            ack = %ack,
            "Delivery acknowledged"
        );
        Ok(())
    }

    /// Empties the history and resets the last-error status, returning
    /// the (empty) history.
    ///
    /// Atomic from the caller's perspective: a concurrent reader observes
    /// either the full prior contents or the fully empty table. The
    /// column schema is preserved. Idempotent.
    pub async fn clear(&self) -> History {
        let mut state = self.state.lock().await;
        state.history.clear();
        state.last_error = None;
        tracing::info!("History cleared");
        state.history.clone()
    }

    /// A snapshot of the current history.
    pub async fn history(&self) -> History {
        self.state.lock().await.history.clone()
    }

    /// The user-facing message of the most recent failed submission, if
    /// the last submission failed. Cleared by a successful submission or
    /// by [`clear`](Pipeline::clear).
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }
}

/// Builder for configuring a [`Pipeline`].
///
/// Defaults to local-only mode (no channel, unconditional local append on
/// validation success) with the system clock.
///
/// # Example
///
/// ```rust,ignore
/// use orderstream_pipeline::Pipeline;
/// use std::time::Duration;
///
/// let pipeline = Pipeline::builder()
///     .channel(channel)          // connected mode
///     .topic("order-events")
///     .delivery_timeout(Duration::from_secs(10))
///     .build();
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    clock: Option<Arc<dyn Clock>>,
    channel: Option<Arc<dyn EventChannel>>,
    topic: Option<String>,
    delivery_timeout: Option<Duration>,
}

impl PipelineBuilder {
    /// Sets the clock used for ingestion timestamps.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Enables connected mode with the given channel.
    #[must_use]
    pub fn channel(mut self, channel: Arc<dyn EventChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Sets the topic accepted submissions are published to.
    ///
    /// Default: [`DEFAULT_TOPIC`].
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the bounded wait for channel acknowledgment.
    ///
    /// Default: [`DEFAULT_DELIVERY_TIMEOUT`].
    #[must_use]
    pub const fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = Some(timeout);
        self
    }

    /// Builds the [`Pipeline`].
    #[must_use]
    pub fn build(self) -> Pipeline {
        let connected = self.channel.is_some();
        let topic = self.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let delivery_timeout = self.delivery_timeout.unwrap_or(DEFAULT_DELIVERY_TIMEOUT);

        tracing::info!(
            connected,
            topic = %topic,
            delivery_timeout = ?delivery_timeout,
            "Pipeline created"
        );

        Pipeline {
            state: Mutex::new(PipelineState {
                history: History::new(),
                watermark: DateTime::<Utc>::MIN_UTC,
                last_error: None,
            }),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            channel: self.channel,
            topic,
            delivery_timeout,
        }
    }
}
