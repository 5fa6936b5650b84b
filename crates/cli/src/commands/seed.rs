//! Populate the catalog with demo data.
//!
//! Upserts the fixed category list by name, then creates `count` random
//! items spread round-robin across the categories. Items are sent in
//! batches; each batch is created concurrently and any failure aborts the
//! run.

use std::collections::HashMap;

use amotos_core::{CategoryDraft, CategoryId, ItemDraft, Price};
use amotos_storefront::pocketbase::{PocketBaseClient, StoreError};
use futures::future::try_join_all;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

/// Default number of items to create.
pub const TOTAL_ITEMS: usize = 2000;

/// Default number of items created concurrently.
pub const BATCH_SIZE: usize = 100;

/// Category names, in round-robin order.
pub const CATEGORIES: [&str; 10] = [
    "Motor",
    "Transmisión",
    "Frenos",
    "Suspensión",
    "Eléctrico",
    "Filtros",
    "Llantas",
    "Carrocería",
    "Accesorios",
    "Lubricantes",
];

const BRANDS: [&str; 10] = [
    "Yamaha", "Honda", "Suzuki", "KTM", "Kawasaki", "BMW", "Ducati", "Aprilia", "Bajaj", "TVS",
];

const IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1502877828070-33b167ad6860?auto=format&fit=crop&w=900&q=80",
    "https://images.unsplash.com/photo-1503736334956-4c8f8e92946d?auto=format&fit=crop&w=900&q=80",
    "https://images.unsplash.com/photo-1489515217757-5fd1be406fef?auto=format&fit=crop&w=900&q=80",
    "https://images.unsplash.com/photo-1518552901867-85dc8e84d825?auto=format&fit=crop&w=900&q=80",
    "https://images.unsplash.com/photo-1504215680853-026ed2a45def?auto=format&fit=crop&w=900&q=80",
    "https://images.unsplash.com/photo-1523966211575-eb4a01e7dd51?auto=format&fit=crop&w=900&q=80",
];

const DESCRIPTIONS: [&str; 6] = [
    "Repuesto original con especificación OEM.",
    "Compatible con modelos de calle y enduro.",
    "Construcción reforzada para mayor durabilidad.",
    "Probado en banco para asegurar tolerancias exactas.",
    "Incluye garantía limitada del fabricante.",
    "Listo para instalar, no requiere modificaciones.",
];

/// Seed categories and `count` items, `batch_size` at a time.
///
/// # Errors
///
/// Returns `StoreError` on the first failed request.
pub async fn run(
    client: &PocketBaseClient,
    count: usize,
    batch_size: usize,
) -> Result<(), StoreError> {
    let category_ids = upsert_categories(client).await?;
    info!(categories = category_ids.len(), "Categories ready");

    // ThreadRng is not Send, so build everything before the first await
    let drafts = build_items(&mut rand::rng(), count, &category_ids);

    let mut inserted = 0;
    for batch in drafts.chunks(batch_size.max(1)) {
        try_join_all(batch.iter().map(|draft| client.create_item(draft))).await?;
        inserted += batch.len();
        info!(inserted, total = drafts.len(), "Inserted batch");
    }

    info!("Seed complete");
    Ok(())
}

/// Ids of the fixed categories in list order, creating any that are missing.
async fn upsert_categories(client: &PocketBaseClient) -> Result<Vec<CategoryId>, StoreError> {
    let existing: HashMap<String, CategoryId> = client
        .all_categories()
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    let mut ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        if let Some(id) = existing.get(name) {
            ids.push(id.clone());
            continue;
        }
        let created = client.create_category(&CategoryDraft::named(name)).await?;
        info!(name, id = %created.id, "Category created");
        ids.push(created.id);
    }
    Ok(ids)
}

/// Random demo items numbered from 1, cycling through `category_ids`.
///
/// Produces nothing when `category_ids` is empty.
pub fn build_items<R: Rng>(rng: &mut R, count: usize, category_ids: &[CategoryId]) -> Vec<ItemDraft> {
    category_ids
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, category)| build_item(rng, i + 1, category.clone()))
        .collect()
}

fn build_item<R: Rng>(rng: &mut R, number: usize, category: CategoryId) -> ItemDraft {
    let brand = BRANDS.choose(rng).copied().unwrap_or("Honda");
    let stock = rng.random_range(1..=30);

    ItemDraft {
        name: format!("Repuesto {number} {brand}"),
        description: DESCRIPTIONS.choose(rng).map(|d| (*d).to_string()),
        price: Price::new(rng.random_range(40_000..500_000)),
        category,
        stock,
        available: stock > 0,
        image_url: IMAGES.choose(rng).map(|u| (*u).to_string()),
        brand: Some(brand.to_string()),
        product_code: format!("MOTO-{number:05}"),
    }
}
