//! The local, append-only history mirroring accepted events.
//!
//! The history is the caller-visible side of the pipeline: one
//! display-formatted row per accepted submission, oldest first, under a
//! fixed seven-column schema. Rows are never edited in place; the only
//! mutations are an append on acceptance and a wholesale clear. The
//! column schema survives a clear so callers can bind to it once.

use crate::event::OrderEvent;
use std::fmt;

/// Display format for history timestamps.
const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The fixed column schema, in display order.
pub const COLUMNS: [&str; 7] = [
    "Order ID",
    "Product Name",
    "Category",
    "Price",
    "Quantity",
    "Customer Location",
    "Timestamp",
];

/// One display-formatted row of the history table.
///
/// A denormalized projection of an [`OrderEvent`]: the price is rendered
/// as currency text and the timestamp as `YYYY-MM-DD HH:MM:SS`. The
/// canonical machine-readable values live on the event, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    /// Order identifier
    pub order_id: String,
    /// Product name
    pub product_name: String,
    /// Category display name
    pub category: String,
    /// Price as currency text, e.g. `$1,299.99`
    pub price: String,
    /// Quantity
    pub quantity: u32,
    /// Customer location
    pub customer_location: String,
    /// Timestamp as `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl HistoryRow {
    /// Projects an event into its display row.
    #[must_use]
    pub fn from_event(event: &OrderEvent) -> Self {
        Self {
            order_id: event.order_id.clone(),
            product_name: event.product_name.clone(),
            category: event.category.to_string(),
            price: format_currency(event.price),
            quantity: event.quantity,
            customer_location: event.customer_location.clone(),
            timestamp: event.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Formats a positive price as currency text with comma grouping.
///
/// `1299.991` becomes `$1,299.99`. Prices reach this function already
/// validated as strictly positive, so there is no sign to group around.
fn format_currency(price: f64) -> String {
    let fixed = format!("{price:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let whole: String = grouped.chars().rev().collect();

    format!("${whole}.{cents}")
}

/// The ordered, append-only, clearable history table.
///
/// Process-local state with application-session lifetime: nothing here is
/// persisted. Owned by the pipeline; callers only ever see clones
/// returned from `submit` and `clear`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    rows: Vec<HistoryRow>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// The column schema, identical before and after any clear.
    #[must_use]
    pub const fn columns(&self) -> [&'static str; 7] {
        COLUMNS
    }

    /// The rows, oldest first.
    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the history holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. Intended for the pipeline only; rows are never
    /// mutated once appended.
    pub fn push(&mut self, row: HistoryRow) {
        self.rows.push(row);
    }

    /// Removes all rows. The column schema is unaffected.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", COLUMNS.join(" | "))?;
        for row in &self.rows {
            writeln!(
                f,
                "{} | {} | {} | {} | {} | {} | {}",
                row.order_id,
                row.product_name,
                row.category,
                row.price,
                row.quantity,
                row.customer_location,
                row.timestamp,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::submission::Submission;
    use chrono::{TimeZone, Utc};

    fn sample_event() -> OrderEvent {
        OrderEvent::from_submission(
            Submission {
                order_id: "ORD-1234-567".to_string(),
                product_name: "Wireless Mouse".to_string(),
                category: Category::Electronics,
                price: 19.99,
                quantity: 2,
                customer_location: "New York, USA".to_string(),
            },
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap(),
        )
    }

    #[test]
    fn currency_formatting_groups_thousands() {
        assert_eq!(format_currency(19.99), "$19.99");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(1299.991), "$1,299.99");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567.00");
    }

    #[test]
    fn row_projection_formats_price_and_timestamp() {
        let row = HistoryRow::from_event(&sample_event());
        assert_eq!(row.order_id, "ORD-1234-567");
        assert_eq!(row.category, "Electronics");
        assert_eq!(row.price, "$19.99");
        assert_eq!(row.quantity, 2);
        assert_eq!(row.timestamp, "2025-06-01 12:30:45");
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut history = History::new();
        let mut second = sample_event();
        second.order_id = "ORD-9999-001".to_string();

        history.push(HistoryRow::from_event(&sample_event()));
        history.push(HistoryRow::from_event(&second));

        assert_eq!(history.len(), 2);
        assert_eq!(history.rows()[0].order_id, "ORD-1234-567");
        assert_eq!(history.rows()[1].order_id, "ORD-9999-001");
    }

    #[test]
    fn clear_empties_rows_but_keeps_schema() {
        let mut history = History::new();
        history.push(HistoryRow::from_event(&sample_event()));
        let columns_before = history.columns();

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.columns(), columns_before);

        // Clearing again is a no-op.
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn display_renders_header_and_rows() {
        let mut history = History::new();
        history.push(HistoryRow::from_event(&sample_event()));
        let rendered = history.to_string();
        let mut lines = rendered.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(" | "));
        assert!(lines.next().unwrap().contains("$19.99"));
    }
}
