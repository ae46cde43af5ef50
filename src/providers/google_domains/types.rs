use crate::browser::{Locator, PollPolicy, xpath_literal};
use crate::config::Config;
use crate::core::hostname;
use crate::core::record::RedirectEntry;

pub const REGISTRAR_URL: &str = "https://domains.google.com/registrar/";
pub const SYNTHETIC_RECORDS: &str = "Synthetic records";
pub const DELETE_DIALOG: &str = "Delete synthetic record?";
pub const PASSWORD_PROMPT: &str = "Enter your password";
pub const SUBDOMAIN_PLACEHOLDER: &str = "Subdomain";
pub const DESTINATION_PLACEHOLDER: &str = "Destination URL";
/// Options ticked on every new redirect.
pub const REDIRECT_OPTIONS: [&str; 3] = ["Temporary redirect (302)", "Forward path", "Enable SSL"];
/// Rows being edited render `old → new` and are not stable entries.
pub const TRANSITION_ARROW: char = '→';

pub struct GoogleDomainsConfig {
    pub domain: String,
    pub poll: PollPolicy,
}

impl From<&Config> for GoogleDomainsConfig {
    fn from(config: &Config) -> Self {
        Self {
            domain: config.domain.clone(),
            poll: config.poll.clone(),
        }
    }
}

pub fn dns_url(domain: &str) -> String {
    format!("{REGISTRAR_URL}{domain}/dns")
}

pub fn sign_in_link() -> Locator {
    Locator::xpath(".//a[contains(text(), 'Sign')]")
}

/// The panel holding the synthetic records table and the add form.
pub fn records_panel() -> Locator {
    Locator::xpath(format!(
        ".//h3[contains(text(), {})]/..",
        xpath_literal(SYNTHETIC_RECORDS)
    ))
}

pub fn rows_mentioning(domain: &str) -> Locator {
    Locator::xpath(format!(
        ".//div[contains(text(), {})]",
        xpath_literal(domain)
    ))
}

/// The row container two levels above the hostname text.
pub fn row_for(hostname: &str) -> Locator {
    Locator::xpath(format!(
        ".//div[contains(text(), {})]/../..",
        xpath_literal(hostname)
    ))
}

pub fn input_with_placeholder(placeholder: &str) -> Locator {
    Locator::xpath(format!(
        ".//input[@placeholder={}]",
        xpath_literal(placeholder)
    ))
}

/// Relative hostname from the first token of a row, if it belongs to `domain`.
pub fn row_hostname(row: &str, domain: &str) -> Option<String> {
    let first = row.split_whitespace().next()?.to_lowercase();
    first
        .contains(domain)
        .then(|| hostname::relative(&first, domain))
}

/// Parses one flattened row: first token is the hostname, last the target.
pub fn parse_row(row: &str, domain: &str) -> Option<RedirectEntry> {
    let last = row.split_whitespace().last()?;
    if last.contains(TRANSITION_ARROW) {
        return None;
    }
    Some(RedirectEntry::new(row_hostname(row, domain)?, last))
}
