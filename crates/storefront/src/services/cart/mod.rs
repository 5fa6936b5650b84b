//! Session cart state.
//!
//! [`CartState`] owns the visitor's cart for the duration of a request. It is
//! restored from a [`CartStorage`] backend, and every mutation writes the full
//! snapshot back and notifies subscribers.
//!
//! A missing, unreadable or malformed snapshot restores as an empty cart; it
//! is logged and never surfaced to the visitor.

mod error;
mod storage;

pub use error::CartStorageError;
pub use storage::{CartStorage, MemoryCartStorage, SessionCartStorage};

use amotos_core::{Cart, Item, ItemId};
use tokio::sync::watch;

/// Observable cart bound to one storage backend.
pub struct CartState<S> {
    storage: S,
    cart: watch::Sender<Cart>,
}

impl<S: CartStorage> CartState<S> {
    /// Rehydrate the cart from `storage`, falling back to an empty cart.
    pub async fn restore(storage: S) -> Self {
        let cart = match storage.load().await {
            Ok(Some(snapshot)) => Cart::from_snapshot(&snapshot).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding malformed cart snapshot");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        };

        let (cart, _) = watch::channel(cart);
        Self { storage, cart }
    }

    /// Receive the cart after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// The current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Add `quantity` of `item`, merging with an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the snapshot could not be persisted; the
    /// in-memory cart is still updated.
    pub async fn add(&self, item: Item, quantity: u32) -> Result<Cart, CartStorageError> {
        self.mutate(|cart| cart.add(item, quantity)).await
    }

    /// Set an entry's quantity, floored at 1.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the snapshot could not be persisted.
    pub async fn update_quantity(&self, id: &ItemId, quantity: i64) -> Result<Cart, CartStorageError> {
        self.mutate(|cart| cart.update_quantity(id, quantity)).await
    }

    /// Remove an entry if present.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the snapshot could not be persisted.
    pub async fn remove(&self, id: &ItemId) -> Result<Cart, CartStorageError> {
        self.mutate(|cart| cart.remove(id)).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the snapshot could not be persisted.
    pub async fn clear(&self) -> Result<Cart, CartStorageError> {
        self.mutate(Cart::clear).await
    }

    async fn mutate(&self, f: impl FnOnce(&mut Cart)) -> Result<Cart, CartStorageError> {
        let mut next = self.snapshot();
        f(&mut next);
        self.cart.send_replace(next.clone());

        let snapshot = next.to_snapshot()?;
        self.storage.save(&snapshot).await?;
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use amotos_core::Price;

    use super::*;

    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        async fn load(&self) -> Result<Option<String>, CartStorageError> {
            Err(CartStorageError::Serialize(
                serde_json::from_str::<()>("!").unwrap_err(),
            ))
        }

        async fn save(&self, _snapshot: &str) -> Result<(), CartStorageError> {
            Ok(())
        }
    }

    fn item(id: &str) -> Item {
        Item {
            id: id.into(),
            name: format!("Repuesto {id}"),
            price: Price::new(10_000),
            ..Item::default()
        }
    }

    #[tokio::test]
    async fn test_restore_missing_snapshot_is_empty() {
        let state = CartState::restore(MemoryCartStorage::default()).await;
        assert!(state.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_restore_malformed_snapshot_is_empty() {
        for snapshot in ["not json", "{\"a\":1}", "[{\"cantidad\":\"x\"}]"] {
            let state = CartState::restore(MemoryCartStorage::with_snapshot(snapshot)).await;
            assert!(state.snapshot().is_empty(), "restored from {snapshot}");
        }
    }

    #[tokio::test]
    async fn test_restore_read_failure_is_empty() {
        let state = CartState::restore(BrokenStorage).await;
        assert!(state.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_persists() {
        let storage = MemoryCartStorage::default();
        let state = CartState::restore(storage.clone()).await;

        state.add(item("a"), 2).await.unwrap();
        let saved = Cart::from_snapshot(&storage.snapshot().unwrap()).unwrap();
        assert_eq!(saved.total_quantity(), 2);

        state.update_quantity(&"a".into(), 5).await.unwrap();
        let saved = Cart::from_snapshot(&storage.snapshot().unwrap()).unwrap();
        assert_eq!(saved.total_quantity(), 5);

        state.clear().await.unwrap();
        assert_eq!(storage.snapshot().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_reload_from_empty_snapshot() {
        let storage = MemoryCartStorage::with_snapshot("[]");
        let state = CartState::restore(storage.clone()).await;
        state.add(Item { id: "x".into(), ..Item::default() }, 1).await.unwrap();
        drop(state);

        let reloaded = CartState::restore(storage).await.snapshot();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.get(&"x".into()).map(|e| e.quantity), Some(1));
    }

    #[tokio::test]
    async fn test_subscribers_receive_new_cart() {
        let state = CartState::restore(MemoryCartStorage::default()).await;
        let mut rx = state.subscribe();

        state.add(item("a"), 1).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().total_quantity(), 1);

        state.remove(&"a".into()).await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }
}
