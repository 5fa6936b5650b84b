//! Session-stored data for storefront.

/// Session keys.
pub mod session_keys {
    /// Key for the serialized cart snapshot.
    pub const CART: &str = "cart";
}
