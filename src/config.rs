use clap::ValueEnum;
use directories::BaseDirs;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::browser::PollPolicy;
use crate::core::hostname;
use crate::error::Error;
use crate::zone_mirror::DEFAULT_ZONE_TARGET;

pub const ENV_PREFIX: &str = "GOOGLE_DOMAINS";
pub const SYSTEM_CONFIG_FILE: &str = "/etc/google-domains.yaml";
pub const USER_CONFIG_FILE: &str = ".google_domains.yaml";
pub const DEFAULT_WEBDRIVER: &str = "http://localhost:4444";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    #[default]
    Ls,
    Add,
    Del,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub verbose: Option<bool>,
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub webdriver: Option<String>,
    pub zone: Option<String>,
    pub zone_target: Option<String>,
    pub wait_timeout: Option<u64>,
    #[serde(skip)]
    pub operation: Option<Operation>,
    #[serde(skip)]
    pub hostname: Option<String>,
    #[serde(skip)]
    pub target: Option<String>,
}

impl PartialConfig {
    /// Overlays `other` on top of `self`.
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            verbose: other.verbose.or(self.verbose),
            domain: other.domain.or(self.domain),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            webdriver: other.webdriver.or(self.webdriver),
            zone: other.zone.or(self.zone),
            zone_target: other.zone_target.or(self.zone_target),
            wait_timeout: other.wait_timeout.or(self.wait_timeout),
            operation: other.operation.or(self.operation),
            hostname: other.hostname.or(self.hostname),
            target: other.target.or(self.target),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Reads every existing file in `paths`, later files winning.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self, Error> {
        let mut config = Self::default();
        for path in paths.iter().filter(|p| p.is_file()) {
            let contents = fs::read_to_string(path).map_err(|e| {
                Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
            })?;
            let file = Self::from_yaml(&contents).map_err(|e| match e {
                Error::ConfigError(msg) => {
                    Error::ConfigError(format!("Invalid config file {}: {msg}", path.display()))
                }
                other => other,
            })?;
            config = config.merge(file);
        }
        Ok(config)
    }

    /// Builds a partial config from `<PREFIX>_*` variables. Empty values
    /// count as unset.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(&format!("{ENV_PREFIX}_{}", key.to_uppercase())).filter(|v| !v.is_empty())
        };
        let verbose = match var("verbose") {
            Some(value) => Some(parse_bool(&value)?),
            None => None,
        };
        Ok(Self {
            verbose,
            domain: var("domain"),
            username: var("username"),
            password: var("password"),
            webdriver: var("webdriver"),
            zone: var("zone"),
            ..Self::default()
        })
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_with(|key| env::var(key).ok())
    }
}

fn parse_bool(value: &str) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::ConfigError(format!(
            "Expected a boolean for {ENV_PREFIX}_VERBOSE, got {other:?}"
        ))),
    }
}

pub fn config_file_locations() -> Vec<PathBuf> {
    let mut paths = vec![Path::new(SYSTEM_CONFIG_FILE).to_path_buf()];
    if let Some(dirs) = BaseDirs::new() {
        paths.push(dirs.home_dir().join(USER_CONFIG_FILE));
    }
    paths
}

/// What this invocation should do. Constructed only through validation, so
/// an `Add` always carries a hostname and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationRequest {
    List,
    Add { hostname: String, target: String },
    Delete { hostname: String },
}

impl ReconciliationRequest {
    pub fn from_parts(
        operation: Operation,
        hostname: Option<String>,
        target: Option<String>,
    ) -> Result<Self, Error> {
        let hostname = hostname.filter(|h| !h.is_empty());
        let target = target.filter(|t| !t.is_empty());
        match operation {
            Operation::Ls => Ok(ReconciliationRequest::List),
            Operation::Add => {
                let hostname = hostname.ok_or_else(|| {
                    Error::ConfigError("The add operation needs a hostname".into())
                })?;
                let target = target.ok_or_else(|| {
                    Error::ConfigError("The add operation needs a target".into())
                })?;
                Ok(ReconciliationRequest::Add { hostname, target })
            }
            Operation::Del => {
                let hostname = hostname.ok_or_else(|| {
                    Error::ConfigError("The del operation needs a hostname".into())
                })?;
                Ok(ReconciliationRequest::Delete { hostname })
            }
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub verbose: bool,
    pub domain: String,
    pub username: String,
    pub password: String,
    pub webdriver: String,
    pub zone: Option<String>,
    pub zone_target: String,
    pub poll: PollPolicy,
    pub request: ReconciliationRequest,
}

impl Config {
    /// Merges the config files, the environment and `cli`, then validates.
    pub fn load(cli: PartialConfig) -> Result<Self, Error> {
        let files = PartialConfig::from_files(&config_file_locations())?;
        let env = PartialConfig::from_env()?;
        Self::resolve(files.merge(env).merge(cli))
    }

    pub fn resolve(partial: PartialConfig) -> Result<Self, Error> {
        let request = ReconciliationRequest::from_parts(
            partial.operation.unwrap_or_default(),
            partial.hostname,
            partial.target,
        )?;

        let required = |value: Option<String>, key: &str| {
            value.filter(|v| !v.is_empty()).ok_or_else(|| {
                Error::ConfigError(format!(
                    "No {key} configured (use --{key} or {ENV_PREFIX}_{})",
                    key.to_uppercase()
                ))
            })
        };

        let poll = PollPolicy {
            max_wait: partial.wait_timeout.map(Duration::from_secs),
            ..PollPolicy::default()
        };

        Ok(Config {
            verbose: partial.verbose.unwrap_or(false),
            domain: required(partial.domain.map(|d| hostname::clean_domain(&d)), "domain")?,
            username: required(partial.username, "username")?,
            password: required(partial.password, "password")?,
            webdriver: partial
                .webdriver
                .unwrap_or_else(|| DEFAULT_WEBDRIVER.to_string()),
            zone: partial.zone.filter(|z| !z.is_empty()),
            zone_target: partial
                .zone_target
                .unwrap_or_else(|| DEFAULT_ZONE_TARGET.to_string()),
            poll,
            request,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("verbose", &self.verbose)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"********")
            .field("webdriver", &self.webdriver)
            .field("zone", &self.zone)
            .field("zone_target", &self.zone_target)
            .field("poll", &self.poll)
            .field("request", &self.request)
            .finish()
    }
}
