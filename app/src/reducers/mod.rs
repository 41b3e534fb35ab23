//! Application reducers
//!
//! Three reducers share [`AppState`] and [`AppAction`]:
//!
//! - [`SessionReducer`]: sign-in, sign-out, and forced sign-out on 401
//! - [`SearchReducer`]: query mutations, page fetches, breed list
//! - [`FavoritesReducer`]: favorites and the match workflow
//!
//! [`app_reducer`] combines them in that order.

mod favorites;
mod search;
mod session;

pub use favorites::FavoritesReducer;
pub use search::SearchReducer;
pub use session::SessionReducer;

use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::state::AppState;
use pawfetch_catalog::{QueryDescriptor, Transport};
use pawfetch_core::async_effect;
use pawfetch_core::composition::{combine_reducers, CombinedReducer};
use pawfetch_core::effect::Effect;
use std::sync::Arc;

/// The full application reducer
#[must_use]
pub fn app_reducer<T: Transport + 'static>() -> CombinedReducer<AppState, AppAction, AppEnvironment<T>> {
    combine_reducers(vec![
        Box::new(SessionReducer::new()),
        Box::new(SearchReducer::new()),
        Box::new(FavoritesReducer::new()),
    ])
}

/// Stamp a new fetch and describe it as an effect
///
/// Whatever the fetch returns comes back as [`AppAction::PageLoaded`] with
/// the sequence number issued here and the current session epoch.
pub(crate) fn fetch_page<T: Transport + 'static>(
    state: &mut AppState,
    descriptor: QueryDescriptor,
    env: &AppEnvironment<T>,
) -> Effect<AppAction> {
    let sequence = state.results.begin();
    let epoch = state.session_epoch;
    let catalog = Arc::clone(&env.catalog);
    tracing::debug!(sequence, page = descriptor.page, "Fetching page");
    metrics::counter!("pawfetch.results.fetches").increment(1);

    async_effect! {
        let result = catalog.fetch_page(&descriptor).await;
        Some(AppAction::PageLoaded { epoch, sequence, result })
    }
}

/// Fetch the breed list
pub(crate) fn load_breeds<T: Transport + 'static>(state: &AppState, env: &AppEnvironment<T>) -> Effect<AppAction> {
    let epoch = state.session_epoch;
    let catalog = Arc::clone(&env.catalog);

    async_effect! {
        let result = catalog.list_breeds().await;
        Some(AppAction::BreedsLoaded { epoch, result })
    }
}
