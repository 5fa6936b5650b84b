//! CLI subcommands.

pub mod migrate;
pub mod seed;

use amotos_storefront::config::PocketBaseConfig;
use amotos_storefront::pocketbase::{PocketBaseClient, StoreError};
use secrecy::SecretString;
use url::Url;

/// Build a store client and authenticate it as a superuser.
///
/// # Errors
///
/// Returns `StoreError` if the client cannot be built or the credentials are
/// rejected.
pub async fn connect(url: Url, user: &str, password: String) -> Result<PocketBaseClient, StoreError> {
    let client = PocketBaseClient::new(&PocketBaseConfig::new(url))?;
    let client = client
        .authenticate_superuser(user, &SecretString::from(password))
        .await?;

    tracing::info!(store = %client.display_host(), "Authenticated as superuser");
    Ok(client)
}
