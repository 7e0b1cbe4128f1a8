//! End-to-end tests for the submission pipeline: validation, delivery,
//! history maintenance, and clearing.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use chrono::Duration as ChronoDuration;
use orderstream_core::category::Category;
use orderstream_core::channel::{ChannelError, EventChannel};
use orderstream_core::clock::Clock;
use orderstream_core::event::{ChannelRecord, DeliveryAck};
use orderstream_core::history::COLUMNS;
use orderstream_core::submission::{SubmissionForm, ValidationError};
use orderstream_pipeline::{Pipeline, SubmitError};
use orderstream_testing::{FailingChannel, RecordingChannel, SteppingClock, test_clock};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

fn filled_form() -> SubmissionForm {
    SubmissionForm::new()
        .order_id("ORD-1234-567")
        .product_name("Wireless Mouse")
        .category(Category::Electronics)
        .price(19.99)
        .quantity(2.0)
        .customer_location("New York, USA")
}

fn local_pipeline() -> Pipeline {
    Pipeline::builder().clock(Arc::new(test_clock())).build()
}

#[tokio::test]
async fn valid_submission_appends_exactly_one_row() {
    let pipeline = local_pipeline();

    let before = pipeline.history().await;
    assert!(before.is_empty());

    let history = pipeline.submit(filled_form()).await.unwrap();
    assert_eq!(history.len(), before.len() + 1);

    let row = &history.rows()[history.len() - 1];
    assert_eq!(row.order_id, "ORD-1234-567");
    assert_eq!(row.product_name, "Wireless Mouse");
    assert_eq!(row.category, "Electronics");
    assert_eq!(row.price, "$19.99");
    assert_eq!(row.quantity, 2);
    assert_eq!(row.customer_location, "New York, USA");
    assert_eq!(row.timestamp, "2025-01-01 00:00:00");
}

#[tokio::test]
async fn missing_field_fails_and_leaves_history_unchanged() {
    let pipeline = local_pipeline();
    pipeline.submit(filled_form()).await.unwrap();
    let before = pipeline.history().await;

    let mut form = filled_form();
    form.product_name = None;
    let err = pipeline.submit(form).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::MissingField {
            field: "product_name"
        })
    ));

    assert_eq!(pipeline.history().await, before);
    assert!(pipeline.last_error().await.is_some());
}

#[tokio::test]
async fn zero_price_cites_invalid_price() {
    let pipeline = local_pipeline();

    let err = pipeline.submit(filled_form().price(0.0)).await.unwrap_err();
    match err {
        SubmitError::Validation(ValidationError::InvalidPrice { price }) => {
            assert!((price - 0.0).abs() < f64::EPSILON);
        },
        other => panic!("expected invalid price, got {other}"),
    }
    assert!(pipeline.history().await.is_empty());
}

#[tokio::test]
async fn fractional_quantity_is_rejected() {
    let pipeline = local_pipeline();

    let err = pipeline
        .submit(filled_form().quantity(2.5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::InvalidQuantity { .. })
    ));
    assert!(pipeline.history().await.is_empty());
}

#[tokio::test]
async fn omitted_order_id_gets_a_generated_one() {
    let pipeline = local_pipeline();

    let mut form = filled_form();
    form.order_id = None;
    let history = pipeline.submit(form).await.unwrap();

    let row = &history.rows()[0];
    assert!(row.order_id.starts_with("ORD-"));
}

#[tokio::test]
async fn connected_mode_publishes_the_wire_record() {
    let channel = Arc::new(RecordingChannel::new());
    let pipeline = Pipeline::builder()
        .clock(Arc::new(test_clock()))
        .channel(channel.clone())
        .build();
    assert!(pipeline.is_connected());

    pipeline.submit(filled_form()).await.unwrap();

    let published = channel.published();
    assert_eq!(published.len(), 1);
    let (topic, record) = &published[0];
    assert_eq!(topic, "order-events");

    // The encoded record reproduces the submission's semantic values,
    // independent of the display-formatted history row.
    let decoded = ChannelRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(decoded.order_id, "ORD-1234-567");
    assert_eq!(decoded.category, Category::Electronics);
    assert!((decoded.price - 19.99).abs() < f64::EPSILON);
    assert_eq!(decoded.quantity, 2);
    assert_eq!(decoded.timestamp, "2025-01-01T00:00:00Z");
}

#[tokio::test]
async fn failed_delivery_never_reaches_the_history() {
    let channel = Arc::new(FailingChannel::unreachable());
    let pipeline = Pipeline::builder()
        .clock(Arc::new(test_clock()))
        .channel(channel.clone())
        .build();

    let err = pipeline.submit(filled_form()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Channel(ChannelError::TransportError(_))
    ));

    assert!(pipeline.history().await.is_empty());
    // Exactly one attempt: the pipeline never retries on its own.
    assert_eq!(channel.attempts(), 1);
    assert!(pipeline.last_error().await.is_some());
}

/// Channel whose acknowledgment never arrives within a test timeout.
struct StalledChannel;

impl EventChannel for StalledChannel {
    fn publish(
        &self,
        _topic: &str,
        _record: &ChannelRecord,
    ) -> Pin<Box<dyn Future<Output = Result<DeliveryAck, ChannelError>> + Send + '_>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(DeliveryAck::new("late".to_string()))
        })
    }
}

#[tokio::test]
async fn stalled_delivery_surfaces_as_timeout() {
    let pipeline = Pipeline::builder()
        .clock(Arc::new(test_clock()))
        .channel(Arc::new(StalledChannel))
        .delivery_timeout(Duration::from_millis(20))
        .build();

    let err = pipeline.submit(filled_form()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Channel(ChannelError::Timeout(_))
    ));
    assert!(pipeline.history().await.is_empty());
}

#[tokio::test]
async fn submissions_keep_order_and_timestamps_never_decrease() {
    // Wall clock stepping backwards one second per reading.
    let clock = SteppingClock::new(test_clock().now(), ChronoDuration::seconds(-1));
    let pipeline = Pipeline::builder().clock(Arc::new(clock)).build();

    pipeline
        .submit(filled_form().order_id("ORD-0001-001"))
        .await
        .unwrap();
    let history = pipeline
        .submit(filled_form().order_id("ORD-0002-002"))
        .await
        .unwrap();

    let rows = history.rows();
    assert_eq!(rows[0].order_id, "ORD-0001-001");
    assert_eq!(rows[1].order_id, "ORD-0002-002");
    // The watermark clamps the second timestamp to the first.
    assert!(rows[1].timestamp >= rows[0].timestamp);
}

#[tokio::test]
async fn forward_clock_produces_increasing_timestamps() {
    let clock = SteppingClock::new(test_clock().now(), ChronoDuration::seconds(1));
    let pipeline = Pipeline::builder().clock(Arc::new(clock)).build();

    pipeline.submit(filled_form()).await.unwrap();
    let history = pipeline.submit(filled_form()).await.unwrap();

    let rows = history.rows();
    assert!(rows[1].timestamp > rows[0].timestamp);
}

#[tokio::test]
async fn clear_is_idempotent_on_an_empty_history() {
    let pipeline = local_pipeline();

    let first = pipeline.clear().await;
    assert!(first.is_empty());

    let second = pipeline.clear().await;
    assert_eq!(first, second);
    assert_eq!(second.columns(), COLUMNS);
}

#[tokio::test]
async fn clear_empties_three_rows_and_keeps_the_schema() {
    let pipeline = local_pipeline();
    for i in 0..3 {
        pipeline
            .submit(filled_form().order_id(format!("ORD-100{i}-00{i}")))
            .await
            .unwrap();
    }
    let full = pipeline.history().await;
    assert_eq!(full.len(), 3);

    let cleared = pipeline.clear().await;
    assert_eq!(cleared.len(), 0);
    assert_eq!(cleared.columns(), full.columns());
}

#[tokio::test]
async fn clear_resets_the_last_error_status() {
    let pipeline = local_pipeline();
    pipeline.submit(filled_form().price(-5.0)).await.unwrap_err();
    assert!(pipeline.last_error().await.is_some());

    pipeline.clear().await;
    assert!(pipeline.last_error().await.is_none());
}

#[tokio::test]
async fn successful_submission_resets_the_last_error_status() {
    let pipeline = local_pipeline();
    pipeline.submit(filled_form().quantity(0.0)).await.unwrap_err();
    assert!(pipeline.last_error().await.is_some());

    pipeline.submit(filled_form()).await.unwrap();
    assert!(pipeline.last_error().await.is_none());
}

#[tokio::test]
async fn concurrent_submissions_do_not_lose_entries() {
    let channel = Arc::new(RecordingChannel::new());
    let pipeline = Arc::new(
        Pipeline::builder()
            .clock(Arc::new(test_clock()))
            .channel(channel.clone())
            .build(),
    );

    let a = {
        let pipeline = pipeline.clone();
        tokio::spawn(
            async move { pipeline.submit(filled_form().order_id("ORD-1111-111")).await },
        )
    };
    let b = {
        let pipeline = pipeline.clone();
        tokio::spawn(
            async move { pipeline.submit(filled_form().order_id("ORD-2222-222")).await },
        )
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(pipeline.history().await.len(), 2);
    assert_eq!(channel.published().len(), 2);
}
