use std::fmt;

#[allow(clippy::enum_variant_names)]
#[derive(Debug)]
pub enum Error {
    ConfigError(String),
    CredentialError(String),
    SessionError(String),
    StaleElement(String),
    NotFound(String),
    ZoneError(String),
}

impl Error {
    /// Configuration problems are reported to the user, not treated as crashes.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::ConfigError(_) | Error::CredentialError(_))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            Error::CredentialError(msg) => write!(f, "Credential error: {msg}"),
            Error::SessionError(msg) => write!(f, "Browser session error: {msg}"),
            Error::StaleElement(msg) => write!(f, "Stale element: {msg}"),
            Error::NotFound(msg) => write!(f, "Not found: {msg}"),
            Error::ZoneError(msg) => write!(f, "Zone error: {msg}"),
        }
    }
}
