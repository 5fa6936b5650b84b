//! URL query parameters for page loads.
//!
//! Every parameter is read as a raw string so that malformed values fall
//! back to their defaults instead of rejecting the request.

use amotos_core::SortOrder;
use serde::Deserialize;

/// Parse a page number; anything missing, non-numeric or below 1 is page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// Parse a price bound; non-numeric values are ignored. `"0"` is a real bound.
#[must_use]
pub fn parse_price(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse::<u64>().ok())
}

fn trimmed(raw: Option<&String>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Parameters of `/tienda`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShopQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub categoria: Option<String>,
    #[serde(rename = "categoriaNombre")]
    pub categoria_nombre: Option<String>,
    pub marca: Option<String>,
    pub disponibles: Option<String>,
    #[serde(rename = "precioMin")]
    pub precio_min: Option<String>,
    #[serde(rename = "precioMax")]
    pub precio_max: Option<String>,
    pub orden: Option<String>,
}

impl ShopQuery {
    #[must_use]
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }

    /// Name search, trimmed.
    #[must_use]
    pub fn search(&self) -> String {
        trimmed(self.search.as_ref())
    }

    /// Category id, trimmed.
    #[must_use]
    pub fn category(&self) -> String {
        trimmed(self.categoria.as_ref())
    }

    /// Category name, trimmed.
    #[must_use]
    pub fn category_name(&self) -> String {
        trimmed(self.categoria_nombre.as_ref())
    }

    /// Brand, trimmed.
    #[must_use]
    pub fn brand(&self) -> String {
        trimmed(self.marca.as_ref())
    }

    /// Only the literal `true` restricts results to available items.
    #[must_use]
    pub fn available_only(&self) -> bool {
        self.disponibles.as_deref() == Some("true")
    }

    /// Raw `precioMin`, trimmed, echoed back to the page.
    #[must_use]
    pub fn price_min_raw(&self) -> String {
        trimmed(self.precio_min.as_ref())
    }

    /// Raw `precioMax`, trimmed, echoed back to the page.
    #[must_use]
    pub fn price_max_raw(&self) -> String {
        trimmed(self.precio_max.as_ref())
    }

    #[must_use]
    pub fn price_min(&self) -> Option<u64> {
        parse_price(self.precio_min.as_deref())
    }

    #[must_use]
    pub fn price_max(&self) -> Option<u64> {
        parse_price(self.precio_max.as_deref())
    }

    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.orden.as_deref().map_or(SortOrder::Relevance, SortOrder::parse)
    }
}

/// Parameters of `/productos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub page: Option<String>,
}

impl ListingQuery {
    #[must_use]
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(None), None);
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(Some("barato")), None);
        assert_eq!(parse_price(Some("0")), Some(0));
        assert_eq!(parse_price(Some(" 35000 ")), Some(35_000));
    }

    #[test]
    fn test_shop_query_accessors() {
        let query = ShopQuery {
            search: Some("  freno ".to_string()),
            disponibles: Some("1".to_string()),
            orden: Some("precio_desc".to_string()),
            ..ShopQuery::default()
        };
        assert_eq!(query.search(), "freno");
        assert!(!query.available_only());
        assert_eq!(query.sort(), SortOrder::PriceDesc);
        assert_eq!(query.page(), 1);

        let query = ShopQuery {
            disponibles: Some("true".to_string()),
            ..ShopQuery::default()
        };
        assert!(query.available_only());
        assert_eq!(query.sort(), SortOrder::Relevance);
    }
}
