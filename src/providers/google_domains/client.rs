use std::sync::Arc;

use log::{debug, info};

use crate::auth::credentials::{CredentialManager, PASSWORD, USERNAME};
use crate::browser::poll::retry_stale;
use crate::browser::{
    BrowserError, Element, ElementRef, Locator, Session, element_by_substring, wait_for_tag,
};
use crate::core::hostname;
use crate::core::record::{RedirectEntry, RedirectMap};
use crate::providers::google_domains::error::GoogleDomainsError;
use crate::providers::google_domains::types::*;
use crate::timer::Timer;

/// Drives the Google Domains DNS page through a borrowed browser session.
pub struct GoogleDomainsProvider<'a> {
    config: GoogleDomainsConfig,
    session: &'a dyn Session,
    credentials: Arc<dyn CredentialManager>,
}

impl<'a> GoogleDomainsProvider<'a> {
    /// Logs in and leaves the session on the domain's DNS page.
    pub async fn new(
        config: GoogleDomainsConfig,
        session: &'a dyn Session,
        credentials: Arc<dyn CredentialManager>,
    ) -> Result<Self, GoogleDomainsError> {
        let provider = Self::unauthenticated(config, session, credentials);
        provider.authenticate().await?;
        Ok(provider)
    }

    /// Wraps a session that is already signed in.
    pub(crate) fn unauthenticated(
        config: GoogleDomainsConfig,
        session: &'a dyn Session,
        credentials: Arc<dyn CredentialManager>,
    ) -> Self {
        Self {
            config,
            session,
            credentials,
        }
    }

    async fn authenticate(&self) -> Result<(), GoogleDomainsError> {
        let _timer = Timer::start("login");
        let username = self
            .credentials
            .get(USERNAME)
            .map_err(|e| GoogleDomainsError::Credential(e.to_string()))?;
        let password = self
            .credentials
            .get(PASSWORD)
            .map_err(|e| GoogleDomainsError::Credential(e.to_string()))?;

        info!("Logging in to Google Domains as {username}");
        self.session.visit(REGISTRAR_URL).await?;
        self.page_control(&sign_in_link(), "sign in link")
            .await?
            .click()
            .await?;

        self.page_control(&Locator::id("identifierId"), "username field")
            .await?
            .fill(&username)
            .await?;
        self.click_next().await?;
        wait_for_tag(self.session, "div", PASSWORD_PROMPT, &self.config.poll).await?;

        self.page_control(&Locator::name("password"), "password field")
            .await?
            .fill(&password)
            .await?;
        self.click_next().await?;

        self.session.visit(&dns_url(&self.config.domain)).await?;
        wait_for_tag(self.session, "h3", SYNTHETIC_RECORDS, &self.config.poll).await?;
        Ok(())
    }

    async fn click_next(&self) -> Result<(), GoogleDomainsError> {
        let session = self.session;
        let clicked = retry_stale(self.config.poll.max_stale_attempts, move || async move {
            for button in session.find_all(&Locator::tag("button")).await? {
                if button.text().await?.trim() == "Next" {
                    button.click().await?;
                    return Ok(true);
                }
            }
            Ok::<bool, BrowserError>(false)
        })
        .await?;

        if !clicked {
            return Err(GoogleDomainsError::MissingControl("Next button".into()));
        }
        Ok(())
    }

    async fn page_control(
        &self,
        locator: &Locator,
        what: &str,
    ) -> Result<ElementRef, GoogleDomainsError> {
        self.session
            .find_first(locator)
            .await?
            .ok_or_else(|| GoogleDomainsError::MissingControl(what.to_string()))
    }

    async fn control(
        &self,
        parent: &dyn Element,
        locator: &Locator,
        what: &str,
    ) -> Result<ElementRef, GoogleDomainsError> {
        parent
            .find_first(locator)
            .await?
            .ok_or_else(|| GoogleDomainsError::MissingControl(what.to_string()))
    }

    async fn records_panel(&self) -> Result<ElementRef, BrowserError> {
        self.session
            .find_first(&records_panel())
            .await?
            .ok_or_else(|| BrowserError::ElementNotFound(format!("{SYNTHETIC_RECORDS} panel")))
    }

    async fn wait_for_success(&self) -> Result<(), BrowserError> {
        // TODO: also watch for the console's error toast so a rejected change
        // fails fast instead of waiting on "Dismiss".
        wait_for_tag(self.session, "a", "Dismiss", &self.config.poll).await
    }

    async fn scan_entries(&self) -> Result<RedirectMap, BrowserError> {
        let domain = &self.config.domain;
        let panel = self.records_panel().await?;
        let mut entries = RedirectMap::new();
        for row in panel.find_all(&rows_mentioning(domain)).await? {
            let html = row.html().await?;
            match parse_row(&html, domain) {
                Some(entry) => {
                    entries.insert(entry.hostname, entry.target);
                }
                None => debug!("  skip: {}", html.trim()),
            }
        }
        Ok(entries)
    }

    /// Scrapes the current redirects, keyed by relative hostname.
    pub async fn list_entries(&self) -> Result<RedirectMap, GoogleDomainsError> {
        let _timer = Timer::start("list_entries");
        let this = self;
        Ok(retry_stale(self.config.poll.max_stale_attempts, move || this.scan_entries()).await?)
    }

    /// Fills in and submits the add form. Does not check for an existing
    /// entry first.
    pub async fn create_entry(&self, entry: &RedirectEntry) -> Result<(), GoogleDomainsError> {
        let _timer = Timer::start("create_entry");
        let domain = &self.config.domain;
        let subdomain = hostname::strip_domain(&hostname::relative(&entry.hostname, domain), domain);

        let panel = self.records_panel().await?;
        self.control(
            &*panel,
            &input_with_placeholder(SUBDOMAIN_PLACEHOLDER),
            "Subdomain field",
        )
        .await?
        .fill(&subdomain)
        .await?;
        self.control(
            &*panel,
            &input_with_placeholder(DESTINATION_PLACEHOLDER),
            "Destination URL field",
        )
        .await?
        .fill(&entry.target)
        .await?;

        for option in REDIRECT_OPTIONS {
            self.control(&*panel, &Locator::text(option), option)
                .await?
                .click()
                .await?;
        }
        self.control(&*panel, &Locator::text("Add"), "Add button")
            .await?
            .click()
            .await?;

        self.wait_for_success().await?;
        info!("Added redirect {} -> {}", entry.hostname, entry.target);
        Ok(())
    }

    /// The row listing exactly `hostname`. The locator matches by substring,
    /// so `api.foobar.com` also finds the row of `myapi.foobar.com`.
    async fn row_element(
        &self,
        panel: &dyn Element,
        hostname: &str,
    ) -> Result<ElementRef, GoogleDomainsError> {
        for row in panel.find_all(&row_for(hostname)).await? {
            let text = row.text().await?;
            if row_hostname(&text, &self.config.domain).as_deref() == Some(hostname) {
                return Ok(row);
            }
        }
        Err(GoogleDomainsError::MissingControl(format!("row for {hostname}")))
    }

    /// Deletes the row for `hostname` through its confirmation dialog.
    pub async fn delete_entry(&self, hostname: &str) -> Result<(), GoogleDomainsError> {
        let _timer = Timer::start("delete_entry");
        let hostname = hostname::relative(hostname, &self.config.domain);

        let panel = self.records_panel().await?;
        let row = self.row_element(&*panel, &hostname).await?;
        let delete = element_by_substring("Delete", row.find_all(&Locator::tag("button")).await?)
            .await?
            .ok_or_else(|| {
                GoogleDomainsError::MissingControl(format!("Delete button for {hostname}"))
            })?;
        delete.click().await?;

        wait_for_tag(self.session, "h3", DELETE_DIALOG, &self.config.poll).await?;
        let forms = self.session.find_all(&Locator::tag("form")).await?;
        let dialog = element_by_substring(DELETE_DIALOG, forms)
            .await?
            .ok_or_else(|| GoogleDomainsError::MissingControl(DELETE_DIALOG.into()))?;
        let confirm = element_by_substring("Delete", dialog.find_all(&Locator::tag("button")).await?)
            .await?
            .ok_or_else(|| GoogleDomainsError::MissingControl("dialog Delete button".into()))?;
        confirm.click().await?;

        self.wait_for_success().await?;
        info!("Deleted redirect {hostname}");
        Ok(())
    }
}
