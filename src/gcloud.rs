//! Thin wrapper around the `gcloud` CLI.

use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::error::Error;

#[derive(Error, Debug)]
pub enum GcloudError {
    #[error("gcloud CLI error: {0}")]
    Cli(String),
    #[error("Unparseable record set: {0}")]
    Parse(String),
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

pub fn map_error(e: GcloudError) -> Error {
    Error::ZoneError(e.to_string())
}

/// Runs one `gcloud` invocation and hands back its stdout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<String, GcloudError>;
}

pub struct GcloudCli {
    program: String,
}

impl GcloudCli {
    pub fn new() -> Self {
        Self {
            program: "gcloud".to_string(),
        }
    }
}

impl Default for GcloudCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GcloudCli {
    async fn run(&self, args: &[String]) -> Result<String, GcloudError> {
        debug!("   exec: {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GcloudError::Cli(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(GcloudError::Cli(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error() {
        let err = map_error(GcloudError::Transaction("add".into()));
        assert!(matches!(err, Error::ZoneError(msg) if msg == "Transaction failed: add"));
    }

    #[tokio::test]
    async fn test_missing_program_is_cli_error() {
        let cli = GcloudCli {
            program: "gcloud-does-not-exist-here".to_string(),
        };
        let result = cli.run(&["version".to_string()]).await;
        assert!(matches!(result, Err(GcloudError::Cli(_))));
    }
}
