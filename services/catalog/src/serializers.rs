//! Wire representation of products
//!
//! Output comes in two shapes. List responses use [`ProductSummary`]; every
//! single-record response uses [`ProductDetail`]. Which one is chosen depends
//! only on the [`ProductAction`] being served, never on the data.
//!
//! Input payloads ignore unknown fields, so a client-supplied `user` or
//! `owner` never reaches the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{NewProduct, Product, ProductChanges};

/// Maximum length of short text columns
pub const MAX_TEXT_LENGTH: usize = 255;

/// Fractional digits kept for prices
pub const PRICE_SCALE: u32 = 2;

/// Total digits a price may carry
pub const PRICE_MAX_DIGITS: u32 = 8;

/// Operation being served on the product resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
}

impl ProductAction {
    /// Render a product in the shape this action responds with
    pub fn shape(self, product: &Product) -> ProductView {
        match self {
            ProductAction::List => ProductView::Summary(ProductSummary::from(product)),
            ProductAction::Retrieve
            | ProductAction::Create
            | ProductAction::Update
            | ProductAction::PartialUpdate => ProductView::Detail(ProductDetail::from(product)),
        }
    }
}

/// Summary shape used by list responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub color: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            color: product.color.clone(),
        }
    }
}

/// Expanded shape used by single-record responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub details: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            summary: ProductSummary::from(product),
            details: product.details.clone(),
            created: product.created,
            updated: product.updated,
        }
    }
}

/// Either output shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductView {
    Summary(ProductSummary),
    Detail(ProductDetail),
}

/// Body of create requests
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ProductPayload {
    /// Validate into the fields of a new record
    pub fn into_new_product(self) -> Result<NewProduct, String> {
        Ok(NewProduct {
            title: validate_title(self.title)?,
            price: validate_price(self.price)?,
            color: validate_color(self.color)?,
            details: self.details,
        })
    }
}

/// Body of full-update requests
///
/// Every writable field must be present. `color` and `details` may be
/// `null`, which clears them; leaving either key out is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductReplacement {
    pub title: String,
    pub price: Decimal,
    #[serde(default, deserialize_with = "present")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub details: Option<Option<String>>,
}

impl ProductReplacement {
    /// Validate into a replacement of every client-writable field
    pub fn into_changes(self) -> Result<ProductChanges, String> {
        let color = self.color.ok_or("color is required")?;
        let details = self.details.ok_or("details is required")?;

        Ok(ProductChanges {
            title: Some(validate_title(self.title)?),
            price: Some(validate_price(self.price)?),
            color: Some(validate_color(color)?),
            details: Some(details),
        })
    }
}

// Marks a key as present, so a missing key (`None`) and an explicit `null`
// (`Some(None)`) stay distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of partial-update requests; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub color: Option<String>,
    pub details: Option<String>,
}

impl ProductPatch {
    /// Validate into the changes to apply
    pub fn into_changes(self) -> Result<ProductChanges, String> {
        Ok(ProductChanges {
            title: self.title.map(validate_title).transpose()?,
            price: self.price.map(validate_price).transpose()?,
            color: validate_color(self.color)?.map(Some),
            details: self.details.map(Some),
        })
    }
}

fn validate_title(title: String) -> Result<String, String> {
    if title.trim().is_empty() {
        return Err("title may not be blank".to_string());
    }
    if title.chars().count() > MAX_TEXT_LENGTH {
        return Err(format!(
            "title must be at most {MAX_TEXT_LENGTH} characters long"
        ));
    }
    Ok(title)
}

fn validate_color(color: Option<String>) -> Result<Option<String>, String> {
    match color {
        Some(c) if c.chars().count() > MAX_TEXT_LENGTH => Err(format!(
            "color must be at most {MAX_TEXT_LENGTH} characters long"
        )),
        other => Ok(other),
    }
}

/// Check a price fits `NUMERIC(8, 2)` and fix its scale to two digits
pub fn validate_price(price: Decimal) -> Result<Decimal, String> {
    let mut price = price.normalize();

    if price.scale() > PRICE_SCALE {
        return Err(format!(
            "price must have no more than {PRICE_SCALE} decimal places"
        ));
    }

    let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_SCALE));
    if price.abs() >= limit {
        return Err(format!(
            "price must have no more than {PRICE_MAX_DIGITS} digits in total"
        ));
    }

    price.rescale(PRICE_SCALE);
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use uuid::Uuid;

    fn sample() -> Product {
        let now = Utc::now();
        Product {
            id: 7,
            owner: Some(Uuid::new_v4()),
            title: "Sample product".to_string(),
            price: Decimal::from_str("10.50").unwrap(),
            color: Some("Maroon".to_string()),
            details: Some("Sample product description".to_string()),
            created: now,
            updated: now,
        }
    }

    fn keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn list_uses_summary_shape() {
        let value = serde_json::to_value(ProductAction::List.shape(&sample())).unwrap();
        assert_eq!(keys(&value), ["color", "id", "price", "title"]);
        assert_eq!(value["price"], "10.50");
    }

    #[test]
    fn single_record_actions_use_expanded_shape() {
        for action in [
            ProductAction::Retrieve,
            ProductAction::Create,
            ProductAction::Update,
            ProductAction::PartialUpdate,
        ] {
            let value = serde_json::to_value(action.shape(&sample())).unwrap();
            assert_eq!(
                keys(&value),
                ["color", "created", "details", "id", "price", "title", "updated"],
                "{action:?}"
            );
        }
    }

    #[test]
    fn owner_is_never_serialized() {
        let value = serde_json::to_value(ProductAction::Retrieve.shape(&sample())).unwrap();
        assert!(value.get("owner").is_none());
        assert!(value.get("user").is_none());
    }

    #[test]
    fn payload_ignores_owner_fields() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "title": "Sample product",
            "price": "10.5",
            "user": Uuid::new_v4(),
            "owner": Uuid::new_v4(),
        }))
        .unwrap();

        let product = payload.into_new_product().unwrap();
        assert_eq!(product.title, "Sample product");
        assert_eq!(product.price.to_string(), "10.50");
        assert_eq!(product.color, None);
    }

    #[test]
    fn payload_accepts_numeric_price() {
        let payload: ProductPayload =
            serde_json::from_value(json!({"title": "Sample product", "price": 10.5})).unwrap();
        assert_eq!(payload.into_new_product().unwrap().price.to_string(), "10.50");
    }

    #[test]
    fn payload_requires_title_and_price() {
        assert!(serde_json::from_value::<ProductPayload>(json!({"price": "1.00"})).is_err());
        assert!(serde_json::from_value::<ProductPayload>(json!({"title": "x"})).is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let payload = ProductPayload {
            title: "   ".to_string(),
            price: Decimal::ONE,
            color: None,
            details: None,
        };
        assert!(payload.into_new_product().is_err());
    }

    #[test]
    fn price_limits() {
        assert_eq!(
            validate_price(Decimal::from_str("999999.99").unwrap()).unwrap().to_string(),
            "999999.99"
        );
        assert_eq!(
            validate_price(Decimal::from_str("10.500").unwrap()).unwrap().to_string(),
            "10.50"
        );
        assert!(validate_price(Decimal::from_str("1000000").unwrap()).is_err());
        assert!(validate_price(Decimal::from_str("1.005").unwrap()).is_err());
    }

    #[test]
    fn replacement_clears_null_optional_fields() {
        let replacement: ProductReplacement = serde_json::from_value(json!({
            "title": "New product",
            "price": "1.00",
            "color": null,
            "details": null,
        }))
        .unwrap();

        let changes = replacement.into_changes().unwrap();
        assert_eq!(changes.color, Some(None));
        assert_eq!(changes.details, Some(None));
    }

    #[test]
    fn replacement_requires_every_key() {
        let replacement: ProductReplacement =
            serde_json::from_value(json!({"title": "New product", "price": "1.00", "color": "Red"}))
                .unwrap();
        assert_eq!(replacement.into_changes().unwrap_err(), "details is required");

        let replacement: ProductReplacement =
            serde_json::from_value(json!({"title": "New product", "price": "1.00", "details": "x"}))
                .unwrap();
        assert_eq!(replacement.into_changes().unwrap_err(), "color is required");
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let patch: ProductPatch =
            serde_json::from_value(json!({"title": "New product", "user": Uuid::new_v4()})).unwrap();
        let changes = patch.into_changes().unwrap();

        assert_eq!(changes.title.as_deref(), Some("New product"));
        assert!(changes.price.is_none());
        assert!(changes.color.is_none());
        assert!(changes.details.is_none());
    }
}
