use log::{info, warn};

use crate::core::hostname;
use crate::core::record::{DNSRecordType, ZoneRecord};
use crate::gcloud::{CommandRunner, GcloudError};
use crate::timer::Timer;

pub const DEFAULT_ZONE_TARGET: &str = "ghs.googlehosted.com.";
pub const MIRROR_TTL: u32 = 300;

pub struct ZoneMirror<R: CommandRunner> {
    runner: R,
    zone: String,
    domain: String,
    target: String,
}

/// Parses the default `gcloud dns record-sets list` layout:
/// `NAME TYPE TTL DATA`, one record set per line.
pub fn parse_record_sets(stdout: &str) -> Result<Vec<ZoneRecord>, GcloudError> {
    let mut records = Vec::new();
    for line in stdout.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] | ["NAME", ..] => continue,
            [name, record_type, ttl, data @ ..] if !data.is_empty() => {
                let Ok(record_type) = record_type.parse::<DNSRecordType>();
                let ttl = ttl
                    .parse()
                    .map_err(|_| GcloudError::Parse(format!("bad ttl in '{line}'")))?;
                records.push(ZoneRecord {
                    name: name.to_string(),
                    record_type,
                    ttl,
                    value: data.join(" "),
                });
            }
            _ => return Err(GcloudError::Parse(line.to_string())),
        }
    }
    Ok(records)
}

impl<R: CommandRunner> ZoneMirror<R> {
    pub fn new(runner: R, zone: &str, domain: &str, target: &str) -> Self {
        Self {
            runner,
            zone: zone.to_string(),
            domain: domain.to_string(),
            target: target.to_string(),
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    fn record_sets(&self, args: &[&str]) -> Vec<String> {
        let mut argv: Vec<String> = ["dns", "record-sets"]
            .iter()
            .chain(args)
            .map(|a| a.to_string())
            .collect();
        argv.push(format!("--zone={}", self.zone));
        argv
    }

    /// The CNAMEs in the zone that point at the mirror target.
    pub async fn list(&self) -> Result<Vec<ZoneRecord>, GcloudError> {
        let _timer = Timer::start("zone_list");
        let stdout = self.runner.run(&self.record_sets(&["list"])).await?;
        Ok(parse_record_sets(&stdout)?
            .into_iter()
            .filter(|r| r.record_type == DNSRecordType::CNAME && r.value == self.target)
            .collect())
    }

    async fn is_mirrored(&self, name: &str) -> Result<bool, GcloudError> {
        Ok(self.list().await?.iter().any(|r| r.name == name))
    }

    /// Adds a CNAME for `hostname` unless one is already there.
    pub async fn ensure(&self, hostname: &str) -> Result<bool, GcloudError> {
        let name = hostname::normalize(hostname, &self.domain, true);
        if self.is_mirrored(&name).await? {
            info!("{name} already mirrored in zone {}", self.zone);
            return Ok(false);
        }
        self.transaction("add", &name).await?;
        info!("Mirrored {name} in zone {}", self.zone);
        Ok(true)
    }

    /// Removes the CNAME for `hostname` if present.
    pub async fn remove(&self, hostname: &str) -> Result<bool, GcloudError> {
        let name = hostname::normalize(hostname, &self.domain, true);
        if !self.is_mirrored(&name).await? {
            info!("{name} not mirrored in zone {}", self.zone);
            return Ok(false);
        }
        self.transaction("remove", &name).await?;
        info!("Removed {name} from zone {}", self.zone);
        Ok(true)
    }

    async fn transaction(&self, action: &str, name: &str) -> Result<(), GcloudError> {
        let _timer = Timer::start("zone_transaction");
        self.runner
            .run(&self.record_sets(&["transaction", "start"]))
            .await?;

        let ttl = format!("--ttl={MIRROR_TTL}");
        let name_arg = format!("--name={name}");
        let change = self.record_sets(&[
            "transaction",
            action,
            self.target.as_str(),
            name_arg.as_str(),
            ttl.as_str(),
            "--type=CNAME",
        ]);

        let result = async {
            self.runner.run(&change).await?;
            self.runner
                .run(&self.record_sets(&["transaction", "execute"]))
                .await
        }
        .await;

        if let Err(err) = result {
            warn!("zone transaction failed, aborting: {err}");
            if let Err(abort) = self
                .runner
                .run(&self.record_sets(&["transaction", "abort"]))
                .await
            {
                warn!("transaction abort failed: {abort}");
            }
            return Err(GcloudError::Transaction(format!("{action} {name}: {err}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcloud::MockCommandRunner;
    use assert_matches::assert_matches;
    use mockall::Sequence;

    const LISTING: &str = "\
NAME                 TYPE   TTL    DATA
foobar.com.          NS     21600  ns-cloud-a1.googledomains.com.,ns-cloud-a2.googledomains.com.
foobar.com.          SOA    21600  ns-cloud-a1.googledomains.com. cloud-dns-hostmaster.google.com. 1 21600 3600 259200 300
baz.foobar.com.      CNAME  300    ghs.googlehosted.com.
other.foobar.com.    CNAME  300    elsewhere.example.com.
";

    fn invokes(args: &[String], sub: &[&str]) -> bool {
        args.len() >= 2 + sub.len() && args[2..2 + sub.len()].iter().zip(sub).all(|(a, b)| a == b)
    }

    fn mirror(runner: MockCommandRunner) -> ZoneMirror<MockCommandRunner> {
        ZoneMirror::new(runner, "my-zone", "foobar.com", DEFAULT_ZONE_TARGET)
    }

    #[test]
    fn test_parse_record_sets() {
        let records = parse_record_sets(LISTING).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].name, "baz.foobar.com.");
        assert_eq!(records[2].record_type, DNSRecordType::CNAME);
        assert_eq!(records[2].ttl, 300);
        assert_eq!(records[2].value, DEFAULT_ZONE_TARGET);
        assert_eq!(records[1].record_type, DNSRecordType::Other("SOA".into()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_matches!(parse_record_sets("a b"), Err(GcloudError::Parse(_)));
        assert_matches!(
            parse_record_sets("a. CNAME soon x."),
            Err(GcloudError::Parse(msg)) if msg.contains("bad ttl")
        );
        assert!(parse_record_sets("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_mirrored_cnames() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| args.last().map(String::as_str) == Some("--zone=my-zone") && invokes(args, &["list"]))
            .times(1)
            .returning(|_| Ok(LISTING.to_string()));

        let records = mirror(runner).list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "baz.foobar.com.");
    }

    #[tokio::test]
    async fn test_ensure_existing_is_noop() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| invokes(args, &["list"]))
            .times(1)
            .returning(|_| Ok(LISTING.to_string()));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction"]))
            .times(0);

        assert!(!mirror(runner).ensure("baz").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_runs_transaction() {
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        runner
            .expect_run()
            .withf(|args| invokes(args, &["list"]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(LISTING.to_string()));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "start"]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|args| {
                invokes(args, &["transaction", "add", DEFAULT_ZONE_TARGET])
                    && args.contains(&"--name=new.foobar.com.".to_string())
                    && args.contains(&"--ttl=300".to_string())
                    && args.contains(&"--type=CNAME".to_string())
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "execute"]))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(String::new()));

        assert!(mirror(runner).ensure("New").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_add_aborts_once() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| invokes(args, &["list"]))
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "start"]))
            .times(1)
            .returning(|_| Ok(String::new()));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "add"]))
            .times(1)
            .returning(|_| Err(GcloudError::Cli("quota exceeded".into())));
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "execute"]))
            .times(0);
        runner
            .expect_run()
            .withf(|args| invokes(args, &["transaction", "abort"]))
            .times(1)
            .returning(|_| Ok(String::new()));

        let result = mirror(runner).ensure("new").await;
        assert_matches!(result, Err(GcloudError::Transaction(msg)) if msg.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| invokes(args, &["list"]))
            .times(1)
            .returning(|_| Ok(LISTING.to_string()));

        // points elsewhere, so it is not ours to remove
        assert!(!mirror(runner).remove("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_runs_transaction() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|args| invokes(args, &["list"]))
            .returning(|_| Ok(LISTING.to_string()));
        runner
            .expect_run()
            .withf(|args| {
                invokes(args, &["transaction", "remove"]) && args.contains(&"--name=baz.foobar.com.".to_string())
            })
            .times(1)
            .returning(|_| Ok(String::new()));
        for step in ["start", "execute"] {
            runner
                .expect_run()
                .withf(move |args| invokes(args, &["transaction", step]))
                .times(1)
                .returning(|_| Ok(String::new()));
        }

        assert!(mirror(runner).remove("baz.foobar.com").await.unwrap());
    }
}
