use crate::error::Error;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("could not start browser session: {0}")]
    Connect(String),

    #[error("WebDriver command failed: {0}")]
    Command(String),

    /// The node was replaced by a re-render after we got hold of it.
    #[error("stale element reference: {0}")]
    Stale(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("gave up after {waited:?} waiting for ({tag}) {substring}")]
    Timeout {
        tag: String,
        substring: String,
        waited: Duration,
    },
}

impl BrowserError {
    pub fn is_stale(&self) -> bool {
        matches!(self, BrowserError::Stale(_))
    }
}

pub fn map_error(e: BrowserError) -> Error {
    use BrowserError::*;
    match e {
        Stale(msg) => Error::StaleElement(msg),
        ElementNotFound(msg) => Error::NotFound(msg),
        other @ (Connect(_) | Command(_) | Timeout { .. }) => Error::SessionError(other.to_string()),
    }
}
