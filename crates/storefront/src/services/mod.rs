//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session cart state: restore, mutate, persist, notify

pub mod cart;

pub use cart::{CartState, CartStorage, CartStorageError, MemoryCartStorage, SessionCartStorage};
