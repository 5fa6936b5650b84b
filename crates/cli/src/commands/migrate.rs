//! Create the catalog collections.
//!
//! Existing collections are left as they are; only missing ones are created.
//! `repuestos` relates to `categorias`, so categories go first.

use amotos_storefront::pocketbase::admin::{CollectionInfo, CollectionSchema};
use amotos_storefront::pocketbase::{PocketBaseClient, StoreError};
use tracing::info;

/// Ensure `categorias` and `repuestos` exist.
///
/// # Errors
///
/// Returns `StoreError` if a lookup fails or a schema is rejected.
pub async fn run(client: &PocketBaseClient) -> Result<(), StoreError> {
    let categories = ensure(client, CollectionSchema::categories()).await?;
    ensure(client, CollectionSchema::items(&categories.id)).await?;

    info!("Migrations complete");
    Ok(())
}

async fn ensure(
    client: &PocketBaseClient,
    schema: CollectionSchema,
) -> Result<CollectionInfo, StoreError> {
    if let Some(existing) = client.find_collection(&schema.name).await? {
        info!(name = %existing.name, id = %existing.id, "Collection already exists");
        return Ok(existing);
    }

    let created = client.create_collection(&schema).await?;
    info!(name = %created.name, id = %created.id, "Collection created");
    Ok(created)
}
