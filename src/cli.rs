use clap::Parser;

use crate::config::{Operation, PartialConfig};

/// Manage Google Domains synthetic record redirects from the command line.
///
/// Settings are read from /etc/google-domains.yaml, then ~/.google_domains.yaml,
/// then GOOGLE_DOMAINS_* environment variables, then these flags.
#[derive(Parser, Debug)]
#[command(name = "google-domains", version)]
#[command(after_help = "Examples:\n  \
    google-domains ls\n  \
    google-domains add foo https://google.com\n  \
    google-domains del foo")]
pub struct Cli {
    /// Increase verbosity and show the browser window
    #[arg(short, long)]
    pub verbose: bool,

    /// Decrease verbosity
    #[arg(short, long)]
    pub quiet: bool,

    /// Google Domains username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Google Domains password
    #[arg(short, long)]
    pub password: Option<String>,

    /// The domain suffix
    #[arg(short, long)]
    pub domain: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Cloud DNS managed zone to mirror hostnames into
    #[arg(long)]
    pub zone: Option<String>,

    /// Record data for mirrored CNAMEs
    #[arg(long)]
    pub zone_target: Option<String>,

    /// Give up waiting for the page after this many seconds
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// The operation to perform
    #[arg(value_enum, default_value_t = Operation::Ls)]
    pub operation: Operation,

    /// The hostname, if adding or deleting
    pub hostname: Option<String>,

    /// The target URL, if adding
    pub target: Option<String>,
}

impl Cli {
    pub fn into_partial(self) -> PartialConfig {
        // -q wins over -v when both are given
        let verbose = if self.quiet {
            Some(false)
        } else if self.verbose {
            Some(true)
        } else {
            None
        };

        PartialConfig {
            verbose,
            domain: self.domain,
            username: self.username,
            password: self.password,
            webdriver: self.webdriver,
            zone: self.zone,
            zone_target: self.zone_target,
            wait_timeout: self.wait_timeout,
            operation: Some(self.operation),
            hostname: self.hostname,
            target: self.target,
        }
    }
}
