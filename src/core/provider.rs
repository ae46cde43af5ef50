use crate::core::record::{RedirectEntry, RedirectMap};
use crate::error::Error;
use async_trait::async_trait;

/// Primitive redirect operations against a registrar. Reconciliation
/// decisions live in `reconcile`; implementations only do what they are told.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectProvider: Send + Sync {
    async fn list_redirects(&self) -> Result<RedirectMap, Error>;
    async fn create_redirect(&self, entry: &RedirectEntry) -> Result<(), Error>;
    async fn delete_redirect(&self, hostname: &str) -> Result<(), Error>;
}
