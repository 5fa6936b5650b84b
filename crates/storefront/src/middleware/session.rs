//! Session middleware configuration.
//!
//! Sessions only hold the visitor's cart, so they live in process memory and
//! are lost on restart.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "amotos_session";

/// Session expiry time in seconds (7 days).
///
/// `MemoryStore` has no expiry sweep. It stops serving a session once it
/// expires but keeps the record until the process restarts, so memory grows
/// with the number of distinct visitors between restarts.
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_expired_sessions_are_not_served() {
        let store = MemoryStore::default();
        let live = record(Duration::seconds(SESSION_EXPIRY_SECONDS));
        let expired = record(Duration::seconds(-1));
        store.save(&live).await.unwrap();
        store.save(&expired).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_some());
        assert!(store.load(&expired.id).await.unwrap().is_none());
    }
}
