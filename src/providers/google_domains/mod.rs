//! Google Domains provider, driven through the registrar's web console

pub mod client;
pub mod error;
pub mod types;

pub use client::GoogleDomainsProvider;
pub use error::map_error;
pub use types::GoogleDomainsConfig;

use crate::core::provider::RedirectProvider;
use crate::core::record::{RedirectEntry, RedirectMap};
use crate::error::Error;
use async_trait::async_trait;

#[async_trait]
impl RedirectProvider for GoogleDomainsProvider<'_> {
    async fn list_redirects(&self) -> Result<RedirectMap, Error> {
        self.list_entries().await.map_err(map_error)
    }

    async fn create_redirect(&self, entry: &RedirectEntry) -> Result<(), Error> {
        self.create_entry(entry).await.map_err(map_error)
    }

    async fn delete_redirect(&self, hostname: &str) -> Result<(), Error> {
        self.delete_entry(hostname).await.map_err(map_error)
    }
}
