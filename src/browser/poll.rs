//! Waiting on an asynchronously rendering page.
//!
//! Clicking a control on the console gives no completion signal. The only way
//! to know an action finished is to watch for some text to show up. A wait
//! keeps polling while the text is absent. Stale element errors raised during
//! a scan are retried from scratch, but only `max_stale_attempts` times in
//! total. After that the last stale error is handed back to the caller.
//!
//! Absence alone never fails a wait unless `max_wait` is set.

use log::{debug, warn};
use std::future::Future;
use std::time::{Duration, Instant};

use super::{BrowserError, Locator, Session};
use crate::timer::Timer;

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DOM_MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_stale_attempts: u32,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_stale_attempts: DOM_MAX_ATTEMPTS,
            max_wait: None,
        }
    }
}

/// Counts stale element errors against a fixed allowance.
#[derive(Debug)]
pub struct StaleBudget {
    attempts: u32,
    max: u32,
}

impl StaleBudget {
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    /// Swallows `err` if it is a stale reference and the budget is not spent.
    /// Anything else is returned unchanged.
    pub fn absorb(&mut self, err: BrowserError) -> Result<(), BrowserError> {
        if !err.is_stale() {
            return Err(err);
        }
        self.attempts += 1;
        if self.attempts >= self.max {
            warn!("giving up after {} stale element errors", self.attempts);
            return Err(err);
        }
        debug!("  stale: retrying ({}/{})", self.attempts, self.max);
        Ok(())
    }
}

/// Runs `op` until it returns something other than a stale element error,
/// retrying at most `max_attempts` times.
pub async fn retry_stale<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BrowserError>>,
{
    let mut budget = StaleBudget::new(max_attempts);
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => budget.absorb(err)?,
        }
    }
}

/// True if a visible `tag` element containing `substring` is on the page.
pub async fn element_exists<S: Session + ?Sized>(
    session: &S,
    tag: &str,
    substring: &str,
) -> Result<bool, BrowserError> {
    for element in session.find_all(&Locator::tag(tag)).await? {
        if element.html().await?.contains(substring) && element.is_visible().await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Blocks until a visible `tag` element containing `substring` appears.
pub async fn wait_for_tag<S: Session + ?Sized>(
    session: &S,
    tag: &str,
    substring: &str,
    policy: &PollPolicy,
) -> Result<(), BrowserError> {
    let _timer = Timer::start("wait_for_tag");
    debug!("   wait: ({tag}) {substring}");

    let started = Instant::now();
    let mut budget = StaleBudget::new(policy.max_stale_attempts);
    loop {
        match element_exists(session, tag, substring).await {
            Ok(true) => {
                debug!("  found: ({tag}) {substring}");
                return Ok(());
            }
            Ok(false) => {
                if let Some(limit) = policy.max_wait {
                    let waited = started.elapsed();
                    if waited >= limit {
                        return Err(BrowserError::Timeout {
                            tag: tag.to_string(),
                            substring: substring.to_string(),
                            waited,
                        });
                    }
                }
                debug!("  sleep: ({tag}) {substring}");
                tokio::time::sleep(policy.interval).await;
            }
            Err(err) => budget.absorb(err)?,
        }
    }
}
