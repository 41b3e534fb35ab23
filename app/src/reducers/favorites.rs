use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::favorites::FavoritesError;
use crate::state::{AppState, MatchStatus};
use pawfetch_catalog::{CatalogError, DogId, Transport};
use pawfetch_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Favorites and the match workflow
pub struct FavoritesReducer<T> {
    _transport: PhantomData<fn() -> T>,
}

impl<T> FavoritesReducer<T> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _transport: PhantomData,
        }
    }
}

impl<T> Default for FavoritesReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + 'static> Reducer for FavoritesReducer<T> {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<T>;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment<T>,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::AddFavorite { id } => {
                log_change("add", state.favorites.add(id, env.storage.as_ref()));
                smallvec![Effect::None]
            },
            AppAction::RemoveFavorite { id } => {
                log_change("remove", state.favorites.remove(&id, env.storage.as_ref()));
                smallvec![Effect::None]
            },
            AppAction::ToggleFavorite { id } => {
                let result = if state.favorites.contains(&id) {
                    state.favorites.remove(&id, env.storage.as_ref())
                } else {
                    state.favorites.add(id, env.storage.as_ref())
                };
                log_change("toggle", result);
                smallvec![Effect::None]
            },

            AppAction::RequestMatch => {
                if state.favorites.current_set().is_empty() {
                    tracing::info!("Match unavailable, no favorites");
                    return smallvec![Effect::None];
                }
                if let Some(request) = state.matching.pending_request() {
                    tracing::debug!(request, "Match already requested");
                    return smallvec![Effect::None];
                }

                let request = state.begin_match();
                let epoch = state.session_epoch;
                let ids: Vec<DogId> = state.favorites.current_set().iter().cloned().collect();
                let catalog = Arc::clone(&env.catalog);
                let failed = move |error| Some(AppAction::MatchFailed { epoch, request, error });

                smallvec![async_effect! {
                    let matched = match catalog.request_match(&ids).await {
                        Ok(matched) => matched,
                        Err(error) => return failed(error),
                    };
                    match catalog.fetch_details(std::slice::from_ref(&matched)).await {
                        Ok(dogs) => match dogs.into_iter().next() {
                            Some(dog) => Some(AppAction::MatchFound { request, dog }),
                            None => failed(CatalogError::MissingDetails { id: matched.to_string() }),
                        },
                        Err(error) => failed(error),
                    }
                }]
            },

            AppAction::MatchFound { request, dog } => {
                if state.matching.pending_request() == Some(request) {
                    tracing::info!(request, id = %dog.id, name = %dog.name, "Match found");
                    state.matching = MatchStatus::Found(dog);
                } else {
                    tracing::debug!(request, id = %dog.id, "Ignoring match for an abandoned request");
                }
                smallvec![Effect::None]
            },

            AppAction::MatchFailed { request, error, .. } => {
                if state.matching.pending_request() == Some(request) {
                    state.matching = MatchStatus::Idle;
                    if !error.is_unauthenticated() {
                        tracing::warn!(request, %error, "Match failed");
                        state.notification = Some(format!("Failed to find a match: {error}"));
                    }
                } else {
                    tracing::debug!(request, %error, "Ignoring failure of an abandoned match request");
                }
                smallvec![Effect::None]
            },

            AppAction::DismissMatch => {
                state.clear_match();
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}

fn log_change(operation: &'static str, result: Result<bool, FavoritesError>) {
    match result {
        Ok(true) => tracing::debug!(operation, "Favorites updated"),
        Ok(false) => tracing::trace!(operation, "Favorites unchanged"),
        Err(error) => tracing::warn!(operation, %error, "Favorites not updated"),
    }
}
