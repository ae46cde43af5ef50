use crate::config::Config;
use crate::error::Error;

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

pub trait CredentialManager: Send + Sync {
    fn get(&self, key: &str) -> Result<String, Error>;
}

/// Login credentials taken from the merged configuration.
pub struct ConfigCredentialManager {
    username: String,
    password: String,
}

impl ConfigCredentialManager {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl From<&Config> for ConfigCredentialManager {
    fn from(config: &Config) -> Self {
        Self::new(&config.username, &config.password)
    }
}

fn required(key: &str, value: &str) -> Result<String, Error> {
    if value.is_empty() {
        return Err(Error::CredentialError(format!("No {key} configured")));
    }
    Ok(value.to_string())
}

impl CredentialManager for ConfigCredentialManager {
    fn get(&self, key: &str) -> Result<String, Error> {
        match key {
            USERNAME => required(key, &self.username),
            PASSWORD => required(key, &self.password),
            _ => Err(Error::CredentialError(format!("Unknown key: {key}"))),
        }
    }
}
