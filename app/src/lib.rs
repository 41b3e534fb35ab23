//! # Pawfetch
//!
//! Browse adoptable dogs from a remote catalog, filter and page through
//! them, keep per-user favorites, and ask the catalog for a match.
//!
//! The application is one [`Store`] running [`app_reducer`]:
//!
//! - [`query::SearchQuery`] holds filter, sort, and page
//! - [`coordinator::ResultCoordinator`] makes the latest query's result the
//!   only one shown, whatever order responses arrive in
//! - [`favorites::FavoritesStore`] keeps the signed-in user's favorites in
//!   durable storage
//!
//! ## Example
//!
//! ```ignore
//! let storage = Arc::new(JsonFileStore::open("pawfetch-storage.json")?);
//! let transport = ReqwestTransport::new(DEFAULT_BASE_URL, Duration::from_secs(10))?;
//! let store = pawfetch::build_store(AppEnvironment::new(transport, storage), 10);
//!
//! store.send_cascading(AppAction::RestoreSession).await?.wait().await;
//! store.send(AppAction::ToggleBreed { breed: "Beagle".into() }).await?.wait().await;
//! ```

pub mod actions;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod favorites;
pub mod query;
pub mod reducers;
pub mod state;
pub mod storage;

pub use actions::AppAction;
pub use config::Config;
pub use environment::AppEnvironment;
pub use reducers::app_reducer;
pub use state::{AppState, MatchStatus, SessionStatus, User};

use pawfetch_catalog::Transport;
use pawfetch_core::composition::CombinedReducer;
use pawfetch_runtime::{Store, StoreConfig};

/// The application store over transport `T`
pub type AppStore<T> = Store<AppState, AppAction, AppEnvironment<T>, CombinedReducer<AppState, AppAction, AppEnvironment<T>>>;

/// Create the application store with the given page size
#[must_use]
pub fn build_store<T: Transport + 'static>(environment: AppEnvironment<T>, page_size: u32) -> AppStore<T> {
    build_store_with_config(environment, page_size, StoreConfig::default())
}

/// Create the application store with a custom runtime configuration
#[must_use]
pub fn build_store_with_config<T: Transport + 'static>(
    environment: AppEnvironment<T>,
    page_size: u32,
    config: StoreConfig,
) -> AppStore<T> {
    Store::with_config(AppState::with_page_size(page_size), app_reducer(), environment, config)
}
