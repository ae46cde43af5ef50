use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Hostname to redirect target, as observed on the console.
pub type RedirectMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedirectEntry {
    pub hostname: String,
    pub target: String,
}

impl RedirectEntry {
    pub fn new(hostname: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            target: target.into(),
        }
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DNSRecordType {
    A,
    AAAA,
    CNAME,
    TXT,
    Other(String),
}

impl FromStr for DNSRecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "A" => DNSRecordType::A,
            "AAAA" => DNSRecordType::AAAA,
            "CNAME" => DNSRecordType::CNAME,
            "TXT" => DNSRecordType::TXT,
            other => DNSRecordType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for DNSRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSRecordType::A => f.write_str("A"),
            DNSRecordType::AAAA => f.write_str("AAAA"),
            DNSRecordType::CNAME => f.write_str("CNAME"),
            DNSRecordType::TXT => f.write_str("TXT"),
            DNSRecordType::Other(name) => f.write_str(name),
        }
    }
}

/// A record set row from a managed zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneRecord {
    pub name: String,
    pub record_type: DNSRecordType,
    pub ttl: u32,
    pub value: String,
}
