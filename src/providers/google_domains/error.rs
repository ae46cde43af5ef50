use crate::browser::{self, BrowserError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoogleDomainsError {
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Control not found: {0}")]
    MissingControl(String),
}

use crate::error::Error;

pub fn map_error(e: GoogleDomainsError) -> Error {
    use GoogleDomainsError::*;
    match e {
        Browser(err) => browser::map_error(err),
        Credential(msg) => Error::CredentialError(msg),
        MissingControl(msg) => Error::NotFound(msg),
    }
}
