//! Spare-part records (`repuestos` collection).
//!
//! Field names on the wire follow the store schema (`nombre`, `precio`, ...);
//! the Rust side uses English names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::category::Category;
use super::id::{CategoryId, ItemId};
use super::price::Price;
use super::timestamp;

/// A catalog item snapshot.
///
/// Every field except `id` has a default so that partial snapshots (for
/// example an item persisted inside a cart) still load. `available` is
/// informational and is not derived from `stock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Price,
    #[serde(rename = "categoria")]
    pub category: CategoryId,
    #[serde(deserialize_with = "lenient_count")]
    pub stock: u32,
    #[serde(rename = "disponible")]
    pub available: bool,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "marca", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "codigo_producto")]
    pub product_code: String,
    #[serde(with = "timestamp::optional")]
    pub created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp::optional")]
    pub updated: Option<DateTime<Utc>>,
    /// Related records, present only when the request asked for expansion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<ItemExpand>,
}

/// Read a count with the same leniency as [`Price`]: fractions truncate,
/// negatives and non-numbers read as zero, oversized values saturate.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let count = Price::from_json_lenient(&value).amount();
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Expanded relations of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemExpand {
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Item {
    /// The trimmed brand, or `None` when missing or blank.
    #[must_use]
    pub fn brand_label(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|brand| !brand.is_empty())
    }

    /// The expanded category, if the record was fetched with expansion.
    #[must_use]
    pub fn expanded_category(&self) -> Option<&Category> {
        self.expand.as_ref().and_then(|e| e.category.as_ref())
    }
}

/// Local validation failures for write payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Payload for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Price,
    #[serde(rename = "categoria", default)]
    pub category: CategoryId,
    #[serde(default)]
    pub stock: u32,
    #[serde(rename = "disponible", default)]
    pub available: bool,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "marca", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "codigo_producto")]
    pub product_code: String,
}

impl ItemDraft {
    /// Check the fields the store requires before sending the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Empty` naming the first blank required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("nombre"));
        }
        if self.product_code.trim().is_empty() {
            return Err(ValidationError::Empty("codigo_producto"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_store_record() {
        let item: Item = serde_json::from_value(json!({
            "id": "a1",
            "collectionId": "pbc_590519246",
            "collectionName": "repuestos",
            "nombre": "Pastillas de freno",
            "precio": 18990,
            "categoria": "c1",
            "stock": 4,
            "disponible": true,
            "marca": " Brembo ",
            "codigo_producto": "MOTO-00001",
            "created": "2025-12-10 13:45:10.123Z",
            "updated": "2025-12-11 08:00:00.000Z",
            "expand": {"categoria": {"id": "c1", "nombre": "Frenos"}}
        }))
        .unwrap();

        assert_eq!(item.id.as_str(), "a1");
        assert_eq!(item.price, Price::new(18_990));
        assert_eq!(item.brand_label(), Some("Brembo"));
        assert_eq!(item.expanded_category().map(|c| c.name.as_str()), Some("Frenos"));
        assert!(item.created.is_some());
    }

    #[test]
    fn test_partial_snapshot_loads_with_defaults() {
        let item: Item = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(item.id.as_str(), "x");
        assert_eq!(item.price, Price::ZERO);
        assert!(item.category.is_empty());
        assert!(item.brand_label().is_none());
    }

    #[test]
    fn test_odd_stock_values_read_leniently() {
        let stock = |value: serde_json::Value| {
            serde_json::from_value::<Item>(json!({"id": "a", "precio": 1000, "stock": value}))
                .unwrap()
                .stock
        };
        assert_eq!(stock(json!(-1)), 0);
        assert_eq!(stock(json!(2.5)), 2);
        assert_eq!(stock(json!("7")), 7);
        assert_eq!(stock(json!("muchos")), 0);
        assert_eq!(stock(json!(null)), 0);
        assert_eq!(stock(json!(10_000_000_000_u64)), u32::MAX);
    }

    #[test]
    fn test_blank_brand_has_no_label() {
        let item = Item {
            brand: Some("   ".to_string()),
            ..Item::default()
        };
        assert!(item.brand_label().is_none());
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = ItemDraft {
            name: "Filtro de aire".to_string(),
            description: None,
            price: Price::new(12_000),
            category: CategoryId::new("c1"),
            stock: 3,
            available: true,
            image_url: None,
            brand: Some("KTM".to_string()),
            product_code: "MOTO-00002".to_string(),
        };
        assert!(draft.validate().is_ok());

        draft.product_code = "  ".to_string();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Empty("codigo_producto"))
        );
    }
}
