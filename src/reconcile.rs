use std::fmt;

use log::info;

use crate::core::hostname;
use crate::core::provider::RedirectProvider;
use crate::core::record::{RedirectEntry, RedirectMap};
use crate::error::Error;

/// What a reconcile step did to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(String),
    Replaced { hostname: String, previous: String },
    AlreadyExists(String),
    Deleted(String),
    NotFound(String),
}

impl Outcome {
    /// False for the no-op outcomes.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::AlreadyExists(_) | Outcome::NotFound(_))
    }

    pub fn hostname(&self) -> &str {
        match self {
            Outcome::Created(h)
            | Outcome::AlreadyExists(h)
            | Outcome::Deleted(h)
            | Outcome::NotFound(h) => h,
            Outcome::Replaced { hostname, .. } => hostname,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(h) => write!(f, "Added {h}"),
            Outcome::Replaced { hostname, previous } => {
                write!(f, "Replaced {hostname} (was {previous})")
            }
            Outcome::AlreadyExists(h) => write!(f, "{h} already exists. Doing nothing."),
            Outcome::Deleted(h) => write!(f, "Deleted {h}"),
            Outcome::NotFound(h) => write!(f, "Hostname not found: {h}. Doing nothing."),
        }
    }
}

pub async fn list<P: RedirectProvider + ?Sized>(provider: &P) -> Result<RedirectMap, Error> {
    provider.list_redirects().await
}

/// Makes `hostname` redirect to `target`, replacing a different target.
pub async fn add<P: RedirectProvider + ?Sized>(
    provider: &P,
    domain: &str,
    hostname: &str,
    target: &str,
) -> Result<Outcome, Error> {
    let hostname = hostname::relative(hostname, domain);
    let entries = provider.list_redirects().await?;

    let previous = match entries.get(&hostname) {
        Some(existing) if existing == target => return Ok(Outcome::AlreadyExists(hostname)),
        Some(existing) => {
            info!("{hostname} points at {existing}, replacing");
            provider.delete_redirect(&hostname).await?;
            Some(existing.clone())
        }
        None => None,
    };

    provider
        .create_redirect(&RedirectEntry::new(hostname.clone(), target))
        .await?;

    Ok(match previous {
        Some(previous) => Outcome::Replaced { hostname, previous },
        None => Outcome::Created(hostname),
    })
}

pub async fn delete<P: RedirectProvider + ?Sized>(
    provider: &P,
    domain: &str,
    hostname: &str,
) -> Result<Outcome, Error> {
    let hostname = hostname::relative(hostname, domain);
    let entries = provider.list_redirects().await?;
    if !entries.contains_key(&hostname) {
        return Ok(Outcome::NotFound(hostname));
    }
    provider.delete_redirect(&hostname).await?;
    Ok(Outcome::Deleted(hostname))
}
