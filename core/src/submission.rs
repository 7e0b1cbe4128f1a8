//! Raw submissions and the validator that turns them into typed values.
//!
//! A [`SubmissionForm`] carries the six order-entry fields exactly as a
//! form layer yields them: every field optional, numerics untrusted (the
//! quantity arrives as a float so a fractional value can be detected and
//! rejected rather than silently truncated). [`validate`] is the single
//! gate between a form and the pipeline: it either produces a fully-typed
//! [`Submission`] or a [`ValidationError`], and it performs no I/O and
//! touches no shared state.

use crate::category::Category;
use rand::Rng;
use thiserror::Error;

/// Rejection reasons reported by [`validate`].
///
/// Each class of failure is distinguishable so a caller can surface a
/// precise message: a missing field names the field, an invalid price or
/// quantity carries the offending value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was absent or blank after trimming.
    #[error("All fields are required: '{field}' is missing")]
    MissingField {
        /// Name of the absent field
        field: &'static str,
    },

    /// The price was zero, negative, or not a finite number.
    #[error("Price must be a positive number (got {price})")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// The quantity was fractional, below one, or not a finite number.
    #[error("Quantity must be a positive integer (got {quantity})")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: f64,
    },
}

/// Raw order-entry fields supplied by a caller.
///
/// All fields are optional; [`validate`] rejects anything incomplete. The
/// order identifier may be left unset when the caller wants the pipeline
/// to generate one (see [`generate_order_id`]).
///
/// # Examples
///
/// ```
/// use orderstream_core::category::Category;
/// use orderstream_core::submission::SubmissionForm;
///
/// let form = SubmissionForm::new()
///     .product_name("Wireless Mouse")
///     .category(Category::Electronics)
///     .price(19.99)
///     .quantity(2.0)
///     .customer_location("New York, USA");
/// assert!(form.order_id.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmissionForm {
    /// Order identifier; `None` requests a generated one
    pub order_id: Option<String>,
    /// Product name
    pub product_name: Option<String>,
    /// Product category from the closed set
    pub category: Option<Category>,
    /// Unit price
    pub price: Option<f64>,
    /// Quantity, as entered (fractional values are rejected, not rounded)
    pub quantity: Option<f64>,
    /// Customer location
    pub customer_location: Option<String>,
}

impl SubmissionForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order identifier.
    #[must_use]
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Sets the product name.
    #[must_use]
    pub fn product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the unit price.
    #[must_use]
    pub const fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the customer location.
    #[must_use]
    pub fn customer_location(mut self, location: impl Into<String>) -> Self {
        self.customer_location = Some(location.into());
        self
    }
}

/// A validated submission with fully-typed fields.
///
/// Produced only by [`validate`]; by construction `price > 0` and
/// `quantity >= 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    /// Order identifier
    pub order_id: String,
    /// Product name, trimmed
    pub product_name: String,
    /// Product category
    pub category: Category,
    /// Unit price, strictly positive
    pub price: f64,
    /// Quantity, at least one
    pub quantity: u32,
    /// Customer location, trimmed
    pub customer_location: String,
}

fn required_str(
    value: Option<&String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let trimmed = value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingField { field })?;
    Ok(trimmed.to_string())
}

/// Validates a raw form into a typed [`Submission`].
///
/// Rules:
/// - every field must be present (strings non-blank after trimming,
///   category chosen, numerics supplied)
/// - the price must be a finite number strictly greater than zero
/// - the quantity must be an integral number no less than one and no
///   greater than `u32::MAX`
///
/// The first failing rule is reported; validation has no side effects, so
/// nothing downstream observes a partially-validated submission.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the missing field or carrying the
/// rejected numeric value.
pub fn validate(form: &SubmissionForm) -> Result<Submission, ValidationError> {
    let order_id = required_str(form.order_id.as_ref(), "order_id")?;
    let product_name = required_str(form.product_name.as_ref(), "product_name")?;
    let category = form
        .category
        .ok_or(ValidationError::MissingField { field: "category" })?;
    let price = form
        .price
        .ok_or(ValidationError::MissingField { field: "price" })?;
    let quantity = form
        .quantity
        .ok_or(ValidationError::MissingField { field: "quantity" })?;
    let customer_location = required_str(form.customer_location.as_ref(), "customer_location")?;

    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::InvalidPrice { price });
    }
    if !quantity.is_finite()
        || quantity < 1.0
        || quantity.fract() != 0.0
        || quantity > f64::from(u32::MAX)
    {
        return Err(ValidationError::InvalidQuantity { quantity });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Bounds checked above: quantity is integral and in 1..=u32::MAX
    let quantity = quantity as u32;

    Ok(Submission {
        order_id,
        product_name,
        category,
        price,
        quantity,
        customer_location,
    })
}

/// Generates a short, human-scannable order identifier.
///
/// Combines a bounded random component with the low-order slice of the
/// current epoch second: `ORD-{1000..=9999}-{epoch % 1000}`. Collisions
/// are unlikely but not impossible; duplicate identifiers are accepted by
/// the pipeline as distinct events, so uniqueness is deliberately not an
/// invariant here.
#[must_use]
pub fn generate_order_id() -> String {
    let random: u32 = rand::thread_rng().gen_range(1000..=9999);
    let slice = chrono::Utc::now().timestamp().rem_euclid(1000);
    format!("ORD-{random}-{slice}")
}
