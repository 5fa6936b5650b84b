//! Facet aggregation over a fetched candidate pool.
//!
//! Counts are computed from whatever pool the caller fetched, not from the
//! whole catalog. [`FacetBasis`] travels with the counts so the UI can say
//! when they are an approximation.

use std::collections::HashMap;

use serde::Serialize;

use crate::text;
use crate::types::{Category, CategoryId, Item, Price};

/// A price range with an inclusive lower edge and an exclusive upper edge.
/// `max: None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBucket {
    pub id: String,
    pub label: String,
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceBucket {
    /// Create a bucket with an explicit label.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, min: u64, max: Option<u64>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min,
            max,
        }
    }

    /// Whether `price` falls in `[min, max)`.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        let amount = price.amount();
        amount >= self.min && self.max.is_none_or(|max| amount < max)
    }

    /// The shop's three buckets: up to $35.000, $35.000 to $65.000, above $65.000.
    #[must_use]
    pub fn storefront_defaults() -> Vec<Self> {
        let low = Price::new(35_000);
        let high = Price::new(65_000);
        vec![
            Self::new("low", format!("Hasta {low}"), 0, Some(low.amount())),
            Self::new(
                "mid",
                format!("{low} a {high}"),
                low.amount(),
                Some(high.amount()),
            ),
            Self::new("high", format!("Más de {high}"), high.amount(), None),
        ]
    }
}

/// Item count for one known category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFacet {
    pub id: CategoryId,
    pub label: String,
    pub count: usize,
}

/// Item count for one brand label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandFacet {
    pub label: String,
    pub count: usize,
}

/// Item count for one price bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceFacet {
    #[serde(flatten)]
    pub bucket: PriceBucket,
    pub count: usize,
}

/// What the counts were computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FacetBasis {
    /// Items in the candidate pool.
    pub sampled: usize,
    /// Catalog size reported by the store when the pool was fetched.
    pub catalog_total: usize,
    /// True when the pool did not cover the whole catalog.
    pub approximate: bool,
}

impl FacetBasis {
    /// Describe a pool of `sampled` items drawn from a catalog of `catalog_total`.
    #[must_use]
    pub const fn new(sampled: usize, catalog_total: usize) -> Self {
        Self {
            sampled,
            catalog_total,
            approximate: sampled < catalog_total,
        }
    }
}

/// All facets for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<CategoryFacet>,
    pub brands: Vec<BrandFacet>,
    pub prices: Vec<PriceFacet>,
    pub basis: FacetBasis,
}

impl Facets {
    /// Aggregate facets over `pool`.
    ///
    /// - categories: one entry per known category, in the given order
    /// - brands: one entry per distinct trimmed non-blank brand, collated
    /// - prices: one entry per bucket; unparsable prices already read as 0
    ///
    /// `catalog_total` is the store-reported size of the collection the pool
    /// was drawn from.
    #[must_use]
    pub fn aggregate(
        pool: &[Item],
        categories: &[Category],
        buckets: &[PriceBucket],
        catalog_total: usize,
    ) -> Self {
        let mut per_category: HashMap<&CategoryId, usize> = HashMap::new();
        let mut per_brand: HashMap<&str, usize> = HashMap::new();
        let mut per_bucket = vec![0usize; buckets.len()];

        for item in pool {
            *per_category.entry(&item.category).or_insert(0) += 1;

            if let Some(brand) = item.brand_label() {
                *per_brand.entry(brand).or_insert(0) += 1;
            }

            for (count, bucket) in per_bucket.iter_mut().zip(buckets) {
                if bucket.contains(item.price) {
                    *count += 1;
                }
            }
        }

        let categories = categories
            .iter()
            .map(|category| CategoryFacet {
                id: category.id.clone(),
                label: category.name.clone(),
                count: per_category.get(&category.id).copied().unwrap_or(0),
            })
            .collect();

        let mut brands: Vec<BrandFacet> = per_brand
            .into_iter()
            .map(|(label, count)| BrandFacet {
                label: label.to_string(),
                count,
            })
            .collect();
        brands.sort_by(|a, b| text::collate(&a.label, &b.label));

        let prices = buckets
            .iter()
            .zip(per_bucket)
            .map(|(bucket, count)| PriceFacet {
                bucket: bucket.clone(),
                count,
            })
            .collect();

        Self {
            categories,
            brands,
            prices,
            basis: FacetBasis::new(pool.len(), catalog_total.max(pool.len())),
        }
    }
}
