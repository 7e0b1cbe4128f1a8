//! # Orderstream Testing
//!
//! Testing utilities and mocks for the orderstream crates.
//!
//! This crate provides:
//! - Deterministic clocks ([`FixedClock`], [`SteppingClock`])
//! - Channel mocks ([`RecordingChannel`], [`FailingChannel`])
//!
//! ## Example
//!
//! ```
//! use orderstream_testing::{RecordingChannel, test_clock};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(test_clock());
//! let channel = Arc::new(RecordingChannel::new());
//! // Wire both into a Pipeline via its builder, then assert on
//! // channel.published() after submitting.
//! ```

use chrono::{DateTime, Duration, Utc};
use orderstream_core::channel::{ChannelError, EventChannel};
use orderstream_core::clock::Clock;
use orderstream_core::event::{ChannelRecord, DeliveryAck};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Mock implementations of the pipeline's injected dependencies.
pub mod mocks {
    use super::{
        AtomicU64, ChannelError, ChannelRecord, Clock, DateTime, DeliveryAck, Duration,
        EventChannel, Future, Mutex, Ordering, Pin, PoisonError, Utc,
    };

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use orderstream_testing::mocks::FixedClock;
    /// use orderstream_core::clock::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now()); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves by a fixed step on every reading.
    ///
    /// The step may be negative to simulate a wall clock jumping
    /// backwards, which is how the pipeline's non-decreasing timestamp
    /// watermark gets exercised.
    #[derive(Debug)]
    pub struct SteppingClock {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start`, advancing by `step` per
        /// reading.
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = *current;
            *current += self.step;
            now
        }
    }

    /// Channel mock that records every published record and acknowledges
    /// each one with a sequential delivery identifier.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use orderstream_testing::mocks::RecordingChannel;
    ///
    /// let channel = RecordingChannel::new();
    /// // ... publish through the pipeline ...
    /// assert!(channel.published().is_empty());
    /// ```
    #[derive(Debug, Default)]
    pub struct RecordingChannel {
        published: Mutex<Vec<(String, ChannelRecord)>>,
        acks: AtomicU64,
    }

    impl RecordingChannel {
        /// Create an empty recording channel.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every `(topic, record)` pair published so far, in order.
        #[must_use]
        pub fn published(&self) -> Vec<(String, ChannelRecord)> {
            self.published
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl EventChannel for RecordingChannel {
        fn publish(
            &self,
            topic: &str,
            record: &ChannelRecord,
        ) -> Pin<Box<dyn Future<Output = Result<DeliveryAck, ChannelError>> + Send + '_>> {
            let topic = topic.to_string();
            let record = record.clone();
            Box::pin(async move {
                self.published
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((topic, record));
                let n = self.acks.fetch_add(1, Ordering::SeqCst);
                Ok(DeliveryAck::new(format!("mock-{n}")))
            })
        }
    }

    /// Channel mock that fails every publish with a configured error.
    ///
    /// Counts attempts so tests can assert that delivery was tried
    /// exactly once (the pipeline never retries on its own).
    #[derive(Debug)]
    pub struct FailingChannel {
        error: ChannelError,
        attempts: AtomicU64,
    }

    impl FailingChannel {
        /// Create a channel that always returns `error`.
        #[must_use]
        pub const fn new(error: ChannelError) -> Self {
            Self {
                error,
                attempts: AtomicU64::new(0),
            }
        }

        /// Create a channel failing with a generic transport error.
        #[must_use]
        pub fn unreachable() -> Self {
            Self::new(ChannelError::TransportError(
                "broker unreachable".to_string(),
            ))
        }

        /// Number of publish attempts so far.
        #[must_use]
        pub fn attempts(&self) -> u64 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl EventChannel for FailingChannel {
        fn publish(
            &self,
            _topic: &str,
            _record: &ChannelRecord,
        ) -> Pin<Box<dyn Future<Output = Result<DeliveryAck, ChannelError>> + Send + '_>> {
            Box::pin(async move {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                Err(self.error.clone())
            })
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FailingChannel, FixedClock, RecordingChannel, SteppingClock, test_clock};
