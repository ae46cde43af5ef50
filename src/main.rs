use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error, info, warn};
use tracing::Level;

mod auth;
mod browser;
mod cli;
mod config;
mod core;
mod error;
mod gcloud;
mod output;
mod providers;
mod reconcile;
mod timer;
mod zone_mirror;

use auth::credentials::ConfigCredentialManager;
use browser::{Session, WebDriverSession};
use cli::Cli;
use config::{Config, ReconciliationRequest};
use crate::core::provider::RedirectProvider;
use error::Error;
use gcloud::{CommandRunner, GcloudCli};
use providers::google_domains::{self, GoogleDomainsConfig, GoogleDomainsProvider};
use reconcile::Outcome;
use zone_mirror::ZoneMirror;

const REDIRECT_HEADERS: [&str; 2] = ["Hostname", "Redirect URL"];
const ZONE_HEADERS: [&str; 2] = ["Zone record", "TTL"];

/// Status 2 for problems the user can fix in their configuration.
fn exit_status(e: &Error) -> u8 {
    if e.is_user_error() { 2 } else { 1 }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load(Cli::parse().into_partial()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n  {e}\n");
            return ExitCode::from(exit_status(&e));
        }
    };

    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    debug!("{config:?}");

    let result = match WebDriverSession::connect(&config.webdriver, !config.verbose).await {
        Ok(session) => run(&config, &session).await,
        Err(e) => Err(browser::map_error(e)),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Performs the request, then closes `session` whether or not it succeeded.
async fn run(config: &Config, session: &dyn Session) -> Result<(), Error> {
    let result = execute(config, session).await;
    close(session).await;
    result
}

async fn close(session: &dyn Session) {
    if let Err(e) = session.close().await {
        warn!("Failed to close browser session: {e}");
    }
}

async fn execute(config: &Config, session: &dyn Session) -> Result<(), Error> {
    let credentials = Arc::new(ConfigCredentialManager::from(config));
    let provider =
        GoogleDomainsProvider::new(GoogleDomainsConfig::from(config), session, credentials)
            .await
            .map_err(google_domains::map_error)?;

    let mirror = config.zone.as_deref().map(|zone| {
        ZoneMirror::new(GcloudCli::new(), zone, &config.domain, &config.zone_target)
    });
    dispatch(config, &provider, mirror.as_ref()).await
}

async fn dispatch<R: CommandRunner>(
    config: &Config,
    provider: &dyn RedirectProvider,
    mirror: Option<&ZoneMirror<R>>,
) -> Result<(), Error> {
    match &config.request {
        ReconciliationRequest::List => {
            print_redirects(provider).await?;
            if let Some(mirror) = mirror {
                print_zone(mirror).await?;
            }
        }
        ReconciliationRequest::Add { hostname, target } => {
            let outcome = reconcile::add(provider, &config.domain, hostname, target).await?;
            report(config, provider, &outcome).await?;
            if let Some(mirror) = mirror {
                mirror
                    .ensure(outcome.hostname())
                    .await
                    .map_err(gcloud::map_error)?;
            }
        }
        ReconciliationRequest::Delete { hostname } => {
            let outcome = reconcile::delete(provider, &config.domain, hostname).await?;
            report(config, provider, &outcome).await?;
            if let Some(mirror) = mirror {
                mirror
                    .remove(outcome.hostname())
                    .await
                    .map_err(gcloud::map_error)?;
            }
        }
    }
    Ok(())
}

async fn report(
    config: &Config,
    provider: &dyn RedirectProvider,
    outcome: &Outcome,
) -> Result<(), Error> {
    if !outcome.changed() {
        println!("{outcome}");
        return Ok(());
    }
    info!("{outcome}");
    if config.verbose {
        print_redirects(provider).await?;
    }
    Ok(())
}

async fn print_redirects(provider: &dyn RedirectProvider) -> Result<(), Error> {
    let rows: Vec<Vec<String>> = reconcile::list(provider)
        .await?
        .into_iter()
        .map(|(hostname, target)| vec![hostname, target])
        .collect();
    println!("\n{}\n", output::render_table(&REDIRECT_HEADERS, &rows));
    Ok(())
}

async fn print_zone<R: CommandRunner>(mirror: &ZoneMirror<R>) -> Result<(), Error> {
    let rows: Vec<Vec<String>> = mirror
        .list()
        .await
        .map_err(gcloud::map_error)?
        .into_iter()
        .map(|record| vec![record.name, record.ttl.to_string()])
        .collect();
    println!("Mirrored in zone {}:", mirror.zone());
    println!("\n{}\n", output::render_table(&ZONE_HEADERS, &rows));
    Ok(())
}
