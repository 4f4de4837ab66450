//! Product models for the catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Stored product record
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    /// Owning user; `None` once the owner account has been deleted
    pub owner: Option<Uuid>,
    pub title: String,
    pub price: Decimal,
    pub color: Option<String>,
    pub details: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Validated fields for a new product. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: Decimal,
    pub color: Option<String>,
    pub details: Option<String>,
}

/// Field-level changes applied by an update
///
/// `None` leaves the stored value alone. For the optional columns,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub color: Option<Option<String>>,
    pub details: Option<Option<String>>,
}

impl ProductChanges {
    /// Apply the changes to a record in place
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(color) = self.color {
            product.color = color;
        }
        if let Some(details) = self.details {
            product.details = details;
        }
    }
}
