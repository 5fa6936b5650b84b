//! Core types for 4AMotos.
//!
//! This module provides type-safe wrappers for the catalog records stored in
//! the remote record store.

pub mod category;
pub mod id;
pub mod item;
pub mod price;
pub mod status;
pub mod timestamp;

pub use category::{Category, CategoryDraft};
pub use id::*;
pub use item::{Item, ItemDraft, ItemExpand, ValidationError};
pub use price::Price;
pub use status::StoreStatus;
