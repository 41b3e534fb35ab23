//! Pawfetch command-line demo
//!
//! Restores the stored session (or signs in), loads the first page of dogs,
//! favorites the first result, and asks the catalog for a match.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and browse Beagles
//! cargo run --bin pawfetch -- "Ada Lovelace" ada@example.com Beagle
//!
//! # Reuse the stored session
//! cargo run --bin pawfetch
//! ```

use anyhow::Context;
use pawfetch::storage::JsonFileStore;
use pawfetch::config::load_env_file;
use pawfetch::{build_store_with_config, AppAction, AppEnvironment, AppStore, Config, SessionStatus};
use pawfetch_catalog::{DogCatalogClient, ReqwestTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pawfetch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match env_file {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        None => tracing::debug!("No environment file loaded"),
    }

    let config = Config::from_env();
    tracing::info!(api = %config.api.base_url, "Starting pawfetch");

    let storage = Arc::new(
        JsonFileStore::open(&config.storage.path)
            .with_context(|| format!("opening storage at {}", config.storage.path.display()))?,
    );
    let transport = ReqwestTransport::new(config.api.base_url.clone(), config.request_timeout())
        .context("building HTTP client")?;
    let catalog = DogCatalogClient::new(transport).with_timeout(config.request_timeout());
    let store = build_store_with_config(
        AppEnvironment::with_client(Arc::new(catalog), storage),
        config.api.page_size,
        config.store_config(),
    );

    let mut args = std::env::args().skip(1);
    let login = match (args.next(), args.next()) {
        (Some(name), Some(email)) => Some((name, email)),
        _ => None,
    };
    let breeds: Vec<String> = args.collect();

    settle(&store, AppAction::RestoreSession).await?;
    if !store.state(|s| s.session.is_signed_in()).await {
        let Some((name, email)) = login else {
            println!("Not signed in. Run: pawfetch <name> <email> [breed...]");
            return Ok(());
        };
        settle(&store, AppAction::Login { name, email }).await?;
    }

    let session = store.state(|s| s.session.clone()).await;
    let SessionStatus::SignedIn(user) = session else {
        let reason = store.state(|s| s.notification.clone()).await;
        anyhow::bail!("sign-in failed: {}", reason.unwrap_or_default());
    };
    println!("Signed in as {} <{}>", user.name, user.email);

    if !breeds.is_empty() {
        settle(&store, AppAction::SetBreeds { breeds: breeds.into_iter().collect() }).await?;
    }

    print_page(&store).await;

    let first = store.state(|s| s.results.dogs().first().map(|d| d.id.clone())).await;
    if let Some(id) = first {
        settle(&store, AppAction::AddFavorite { id }).await?;
        settle(&store, AppAction::RequestMatch).await?;

        match store.state(|s| s.matched_dog().cloned()).await {
            Some(dog) => println!("Your match: {} ({}, {} years, {})", dog.name, dog.breed, dog.age, dog.zip_code),
            None => println!("No match this time"),
        }
    }

    if let Some(message) = store.state(|s| s.notification.clone()).await {
        println!("Notice: {message}");
    }

    store
        .shutdown_default()
        .await
        .context("waiting for in-flight requests")?;
    Ok(())
}

/// Send `action` and wait until it and everything it triggered has been reduced
async fn settle(store: &AppStore<ReqwestTransport>, action: AppAction) -> anyhow::Result<()> {
    let mut handle = store.send_cascading(action).await?;
    handle
        .wait_with_timeout(SETTLE_TIMEOUT)
        .await
        .map_err(|()| anyhow::anyhow!("timed out after {SETTLE_TIMEOUT:?}"))
}

async fn print_page(store: &AppStore<ReqwestTransport>) {
    let (page, total, dogs) = store
        .state(|s| (s.query.page(), s.results.total(), s.results.dogs().to_vec()))
        .await;

    println!("Page {page} of {} dogs", total.unwrap_or(0));
    for dog in dogs {
        println!("  {:<12} {:<24} {:>2}y  {}", dog.name, dog.breed, dog.age, dog.zip_code);
    }
}
