//! # Orderstream Core
//!
//! Domain types and pure logic for the orderstream ingestion simulator.
//!
//! Orderstream mimics a single producer feeding a streaming ingestion
//! pipeline: a caller supplies the fields of a commerce order, the system
//! validates them, stamps an ingestion time, publishes the resulting event
//! to an (optional) event channel, and mirrors every accepted event into a
//! local, display-formatted history table.
//!
//! ## Core Concepts
//!
//! - **Submission**: raw, unvalidated order-entry fields from a caller
//! - **Event**: canonical, validated, timestamped record derived from a
//!   Submission
//! - **Event Channel**: abstract external system events are published to
//! - **History**: local, append-only, clearable table mirroring accepted
//!   events for display
//!
//! This crate is free of I/O: validation, event construction, and history
//! bookkeeping are all pure. The stateful engine that wires them together
//! lives in `orderstream-pipeline`, and the Kafka-compatible channel
//! implementation lives in `orderstream-redpanda`.
//!
//! ## Example
//!
//! ```
//! use orderstream_core::category::Category;
//! use orderstream_core::submission::{SubmissionForm, validate};
//!
//! let form = SubmissionForm::new()
//!     .order_id("ORD-1234-567")
//!     .product_name("Wireless Mouse")
//!     .category(Category::Electronics)
//!     .price(19.99)
//!     .quantity(2.0)
//!     .customer_location("New York, USA");
//!
//! let submission = validate(&form).expect("a fully filled form validates");
//! assert_eq!(submission.quantity, 2);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod category;
pub mod channel;
pub mod event;
pub mod history;
pub mod submission;

/// Clock abstraction - injects time so ingestion timestamps are testable
///
/// All time observations in the pipeline go through a [`clock::Clock`]
/// rather than calling `Utc::now()` directly. Production code uses
/// [`clock::SystemClock`]; tests use the deterministic clocks from
/// `orderstream-testing`.
pub mod clock {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use orderstream_core::clock::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let t1 = clock.now();
    /// let t2 = clock.now();
    /// assert!(t2 >= t1);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::clock::{Clock, SystemClock};

    #[test]
    fn system_clock_is_non_decreasing() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 >= t1);
    }
}
