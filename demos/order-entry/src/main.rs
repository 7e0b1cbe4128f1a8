//! Order entry demo: a stand-in for the form layer.
//!
//! Drives the submission pipeline the way a UI would: a few valid
//! submissions, one rejected submission, and a clear, printing the
//! history table after each step.
//!
//! # Usage
//!
//! Local-only mode (no event channel):
//! ```bash
//! cargo run --bin order-entry
//! ```
//!
//! Connected mode (publishes each accepted order to `order-events`):
//! ```bash
//! ORDERSTREAM_BROKERS=localhost:9092 cargo run --bin order-entry
//! ```
//!
//! In connected mode an unusable broker configuration is a startup
//! error: the demo refuses to run rather than failing on first use.

use anyhow::Context;
use orderstream_core::category::Category;
use orderstream_core::submission::SubmissionForm;
use orderstream_pipeline::Pipeline;
use orderstream_redpanda::RedpandaChannel;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("=== Orderstream Order Entry ===");

    let mut builder = Pipeline::builder();
    if let Ok(brokers) = std::env::var("ORDERSTREAM_BROKERS") {
        info!("Connected mode: publishing to {}", brokers);
        let channel = RedpandaChannel::new(&brokers)
            .context("connected mode refused: event channel unavailable")?;
        builder = builder.channel(Arc::new(channel));
    } else {
        info!("Local-only mode (set ORDERSTREAM_BROKERS for connected mode)");
    }
    let pipeline = builder.build();

    let orders = [
        SubmissionForm::new()
            .order_id("ORD-1234-567")
            .product_name("Wireless Mouse")
            .category(Category::Electronics)
            .price(19.99)
            .quantity(2.0)
            .customer_location("New York, USA"),
        SubmissionForm::new()
            .product_name("Cast Iron Skillet")
            .category(Category::HomeKitchen)
            .price(34.50)
            .quantity(1.0)
            .customer_location("Lyon, France"),
        SubmissionForm::new()
            .product_name("Chess Set")
            .category(Category::ToysGames)
            .price(1249.00)
            .quantity(1.0)
            .customer_location("Reykjavik, Iceland"),
    ];

    for form in orders {
        let history = pipeline.submit(form).await?;
        println!("\n{history}");
    }

    // A submission the validator rejects; the history stays as it was.
    let rejected = SubmissionForm::new()
        .product_name("Free Sample")
        .category(Category::HealthBeauty)
        .price(0.0)
        .quantity(1.0)
        .customer_location("Berlin, Germany");
    if let Err(e) = pipeline.submit(rejected).await {
        warn!("rejected as expected: {e}");
    }
    if let Some(message) = pipeline.last_error().await {
        println!("\nlast error: {message}");
    }

    let cleared = pipeline.clear().await;
    println!("\nafter clear ({} rows):\n{cleared}", cleared.len());

    Ok(())
}
