//! Search criteria and the store filter-expression builder.
//!
//! The record store accepts a boolean expression such as
//! `nombre ~ "freno" && precio <= 50000`. Expressions are assembled from a
//! typed clause list; string operands always go through [`quote`], so user
//! input cannot terminate a literal early and break the query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// Store field names used in filter expressions.
pub mod fields {
    pub const NAME: &str = "nombre";
    pub const CATEGORY: &str = "categoria";
    pub const CATEGORY_NAME: &str = "categoria.nombre";
    pub const BRAND: &str = "marca";
    pub const AVAILABLE: &str = "disponible";
    pub const PRICE: &str = "precio";
}

/// Structured search criteria. Every field is optional and `None` imposes no
/// constraint; `available: Some(false)` is a real filter, distinct from `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring of the item name.
    pub name: Option<String>,
    /// Exact category id.
    pub category: Option<CategoryId>,
    /// Substring of the related category's name, for names that did not
    /// resolve to an id.
    pub category_name: Option<String>,
    /// Exact brand.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<u64>,
    /// Inclusive upper price bound.
    pub price_max: Option<u64>,
    /// Availability flag.
    pub available: Option<bool>,
    /// Result ordering. Not part of the filter expression.
    pub sort: SortOrder,
}

impl SearchFilters {
    /// Build the filter expression for these criteria.
    ///
    /// Clauses are emitted in a fixed order (name, category, category name,
    /// brand, availability, min price, max price) and joined with `&&`.
    #[must_use]
    pub fn to_filter_expr(&self) -> FilterExpr {
        let mut expr = FilterExpr::default();

        if let Some(name) = non_blank(self.name.as_deref()) {
            expr.push(Clause::Contains(fields::NAME, name.to_string()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            expr.push(Clause::Equals(
                fields::CATEGORY,
                Operand::Text(category.to_string()),
            ));
        }
        if let Some(category_name) = non_blank(self.category_name.as_deref()) {
            expr.push(Clause::Contains(
                fields::CATEGORY_NAME,
                category_name.to_string(),
            ));
        }
        if let Some(brand) = non_blank(self.brand.as_deref()) {
            expr.push(Clause::Equals(fields::BRAND, Operand::Text(brand.to_string())));
        }
        if let Some(available) = self.available {
            expr.push(Clause::Equals(fields::AVAILABLE, Operand::Bool(available)));
        }
        if let Some(min) = self.price_min {
            expr.push(Clause::AtLeast(fields::PRICE, min));
        }
        if let Some(max) = self.price_max {
            expr.push(Clause::AtMost(fields::PRICE, max));
        }

        expr
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Result ordering offered to shoppers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Store default order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
}

impl SortOrder {
    /// Parse from the `orden` URL parameter. Unknown values mean relevance.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "precio_asc" => Self::PriceAsc,
            "precio_desc" => Self::PriceDesc,
            "recientes" => Self::Newest,
            "antiguos" => Self::Oldest,
            _ => Self::Relevance,
        }
    }

    /// Convert to the `orden` URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevancia",
            Self::PriceAsc => "precio_asc",
            Self::PriceDesc => "precio_desc",
            Self::Newest => "recientes",
            Self::Oldest => "antiguos",
        }
    }

    /// The store sort directive, or `None` for the default order.
    #[must_use]
    pub const fn directive(self) -> Option<&'static str> {
        match self {
            Self::Relevance => None,
            Self::PriceAsc => Some("+precio"),
            Self::PriceDesc => Some("-precio"),
            Self::Newest => Some("-created"),
            Self::Oldest => Some("+created"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Contains(&'static str, String),
    Equals(&'static str, Operand),
    AtLeast(&'static str, u64),
    AtMost(&'static str, u64),
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(field, value) => write!(f, "{field} ~ {}", quote(value)),
            Self::Equals(field, Operand::Text(value)) => write!(f, "{field} = {}", quote(value)),
            Self::Equals(field, Operand::Bool(value)) => write!(f, "{field} = {value}"),
            Self::AtLeast(field, value) => write!(f, "{field} >= {value}"),
            Self::AtMost(field, value) => write!(f, "{field} <= {value}"),
        }
    }
}

/// A conjunction of filter clauses. Displays as the store expression; an
/// empty expression displays as the empty string and matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    clauses: Vec<Clause>,
}

impl FilterExpr {
    fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Whether no clause was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Quote a string operand: wrap in double quotes, backslash-escaping `\` and `"`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scan an expression the way the store's lexer does and report whether
    /// every quoted literal is closed.
    fn literals_balanced(expr: &str) -> bool {
        let mut in_literal = false;
        let mut escaped = false;
        for ch in expr.chars() {
            if in_literal {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_literal = false;
                }
            } else if ch == '"' {
                in_literal = true;
            }
        }
        !in_literal && !escaped
    }

    #[test]
    fn test_empty_filters_build_empty_expression() {
        let expr = SearchFilters::default().to_filter_expr();
        assert!(expr.is_empty());
        assert_eq!(expr.to_string(), "");
    }

    #[test]
    fn test_blank_strings_add_no_clause() {
        let filters = SearchFilters {
            name: Some("   ".to_string()),
            brand: Some(String::new()),
            category: Some(CategoryId::default()),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_filter_expr().to_string(), "");
    }

    #[test]
    fn test_all_clauses_in_order() {
        let filters = SearchFilters {
            name: Some("freno".to_string()),
            category: Some(CategoryId::new("c1")),
            category_name: None,
            brand: Some("Honda".to_string()),
            price_min: Some(10_000),
            price_max: Some(50_000),
            available: Some(true),
            sort: SortOrder::PriceAsc,
        };
        assert_eq!(
            filters.to_filter_expr().to_string(),
            "nombre ~ \"freno\" && categoria = \"c1\" && marca = \"Honda\" \
             && disponible = true && precio >= 10000 && precio <= 50000"
        );
    }

    #[test]
    fn test_availability_false_is_a_filter() {
        let filters = SearchFilters {
            available: Some(false),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_filter_expr().to_string(), "disponible = false");
    }

    #[test]
    fn test_zero_price_bound_is_kept() {
        let filters = SearchFilters {
            price_min: Some(0),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_filter_expr().to_string(), "precio >= 0");
    }

    #[test]
    fn test_category_name_uses_relation_field() {
        let filters = SearchFilters {
            category_name: Some("Frenos".to_string()),
            ..SearchFilters::default()
        };
        assert_eq!(
            filters.to_filter_expr().to_string(),
            "categoria.nombre ~ \"Frenos\""
        );
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let names = [
            "Filtro \"K&N\"",
            "\"",
            "termina en \\",
            "\\\"",
            "a\" || precio > 0 || nombre ~ \"",
        ];
        for name in names {
            let filters = SearchFilters {
                name: Some(name.to_string()),
                price_max: Some(1),
                ..SearchFilters::default()
            };
            let expr = filters.to_filter_expr().to_string();
            assert!(literals_balanced(&expr), "unbalanced: {expr}");
            assert!(expr.ends_with("&& precio <= 1"), "clause swallowed: {expr}");
        }
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("K&N"), "\"K&N\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_sort_order_parse_and_directive() {
        assert_eq!(SortOrder::parse("precio_desc"), SortOrder::PriceDesc);
        assert_eq!(SortOrder::parse("desconocido"), SortOrder::Relevance);
        assert_eq!(SortOrder::Relevance.directive(), None);
        assert_eq!(SortOrder::Newest.directive(), Some("-created"));
        assert_eq!(SortOrder::Oldest.directive(), Some("+created"));
        assert_eq!(SortOrder::PriceAsc.as_str(), "precio_asc");
    }
}
