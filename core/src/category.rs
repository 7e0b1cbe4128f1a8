//! The closed set of product categories accepted by the pipeline.
//!
//! The enumeration is fixed at any given deployment: adding a variant is a
//! code change, and the wire format carries the human-readable name (e.g.
//! `"Home & Kitchen"`), so downstream consumers see the same closed set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing a string that names no known category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A product category from the fixed deployment set.
///
/// Serializes to and from the exact display strings so the outbound wire
/// record and the history table agree with what a form layer shows.
///
/// # Examples
///
/// ```
/// use orderstream_core::category::Category;
///
/// assert_eq!(Category::HomeKitchen.to_string(), "Home & Kitchen");
/// assert_eq!("Electronics".parse::<Category>(), Ok(Category::Electronics));
/// assert!("Groceries".parse::<Category>().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Consumer electronics
    Electronics,
    /// Books and printed media
    Books,
    /// Home and kitchen goods
    #[serde(rename = "Home & Kitchen")]
    HomeKitchen,
    /// Apparel
    Clothing,
    /// Toys and games
    #[serde(rename = "Toys & Games")]
    ToysGames,
    /// Health and beauty products
    #[serde(rename = "Health & Beauty")]
    HealthBeauty,
}

impl Category {
    /// Every category, in the order a form layer should present them.
    pub const ALL: [Self; 6] = [
        Self::Electronics,
        Self::Books,
        Self::HomeKitchen,
        Self::Clothing,
        Self::ToysGames,
        Self::HealthBeauty,
    ];

    /// The display (and wire) name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Books => "Books",
            Self::HomeKitchen => "Home & Kitchen",
            Self::Clothing => "Clothing",
            Self::ToysGames => "Toys & Games",
            Self::HealthBeauty => "Health & Beauty",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
