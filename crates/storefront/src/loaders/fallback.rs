//! Fetch-with-fallback for page loads.
//!
//! A page load never fails because one store call did: the failed value is
//! replaced by a fallback and the failure is recorded so the loader can
//! decide what to tell the visitor.

use serde::Serialize;

use crate::pocketbase::StoreError;

/// Why a fetch fell back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// What was being fetched, e.g. `"categories"`.
    pub what: &'static str,
    /// The store error, for logs.
    pub reason: String,
    /// Whether the store said the record does not exist.
    pub not_found: bool,
}

/// A fetched value, or its fallback plus the failure that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guarded<T> {
    pub value: T,
    pub failure: Option<LoadFailure>,
}

impl<T> Guarded<T> {
    /// Whether the value came from the store.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Whether the fetch failed because the record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.failure.as_ref().is_some_and(|f| f.not_found)
    }
}

/// Keep `result`'s value, or log the error at WARN and use `T::default()`.
pub fn guarded<T: Default>(what: &'static str, result: Result<T, StoreError>) -> Guarded<T> {
    guarded_or(what, result, T::default)
}

/// Keep `result`'s value, or log the error at WARN and use `fallback()`.
pub fn guarded_or<T>(
    what: &'static str,
    result: Result<T, StoreError>,
    fallback: impl FnOnce() -> T,
) -> Guarded<T> {
    match result {
        Ok(value) => Guarded {
            value,
            failure: None,
        },
        Err(e) => {
            tracing::warn!(what, error = %e, "Store fetch failed, using fallback");
            Guarded {
                value: fallback(),
                failure: Some(LoadFailure {
                    what,
                    reason: e.to_string(),
                    not_found: e.is_not_found(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let g = guarded("numbers", Ok(vec![1, 2]));
        assert!(g.is_ok());
        assert_eq!(g.value, vec![1, 2]);
    }

    #[test]
    fn test_error_uses_fallback() {
        let g: Guarded<Vec<u8>> = guarded(
            "numbers",
            Err(StoreError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert!(!g.is_ok());
        assert!(!g.is_not_found());
        assert!(g.value.is_empty());
        assert_eq!(g.failure.map(|f| f.what), Some("numbers"));
    }

    #[test]
    fn test_not_found_is_flagged() {
        let g = guarded_or(
            "item",
            Err::<u32, _>(StoreError::NotFound("repuestos/x".to_string())),
            || 7,
        );
        assert_eq!(g.value, 7);
        assert!(g.is_not_found());
    }
}
