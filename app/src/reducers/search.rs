use super::{fetch_page, load_breeds};
use crate::actions::AppAction;
use crate::coordinator::Resolution;
use crate::environment::AppEnvironment;
use crate::query::QueryChange;
use crate::state::AppState;
use pawfetch_catalog::Transport;
use pawfetch_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::marker::PhantomData;

/// Query mutations and the results they lead to
///
/// Each mutation produces a [`QueryChange`]; while signed in, the change's
/// descriptor is fetched under a fresh sequence number and only the newest
/// [`AppAction::PageLoaded`] is applied.
pub struct SearchReducer<T> {
    _transport: PhantomData<fn() -> T>,
}

impl<T> SearchReducer<T> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _transport: PhantomData,
        }
    }
}

impl<T> Default for SearchReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + 'static> SearchReducer<T> {
    fn refetch(
        state: &mut AppState,
        change: QueryChange,
        env: &AppEnvironment<T>,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        if !state.session.is_signed_in() {
            tracing::debug!(revision = change.revision, "Query changed while signed out, not fetching");
            return smallvec![Effect::None];
        }
        smallvec![fetch_page(state, change.descriptor, env)]
    }
}

impl<T: Transport + 'static> Reducer for SearchReducer<T> {
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
            AppAction::SetBreeds { breeds } => {
                let change = state.query.set_breeds(breeds);
                Self::refetch(state, change, env)
            },
            AppAction::ToggleBreed { breed } => {
                let change = state.query.toggle_breed(&breed);
                Self::refetch(state, change, env)
            },
            AppAction::SetSort { sort } => {
                let change = state.query.set_sort(sort.field, sort.direction);
                Self::refetch(state, change, env)
            },
            AppAction::ToggleSortField { field } => {
                let change = state.query.toggle_sort_field(field);
                Self::refetch(state, change, env)
            },
            AppAction::SetPage { page } => {
                let change = state.query.set_page(page);
                Self::refetch(state, change, env)
            },
            AppAction::NextPage => {
                let change = state.query.next_page();
                Self::refetch(state, change, env)
            },
            AppAction::PreviousPage => match state.query.previous_page() {
                Some(change) => Self::refetch(state, change, env),
                None => smallvec![Effect::None],
            },
            AppAction::SetZipCodes { zip_codes } => {
                let change = state.query.set_zip_codes(zip_codes);
                Self::refetch(state, change, env)
            },
            AppAction::SetAgeRange { min, max } => {
                let change = state.query.set_age_range(min, max);
                Self::refetch(state, change, env)
            },
            AppAction::Refresh => {
                if !state.session.is_signed_in() {
                    return smallvec![Effect::None];
                }
                let descriptor = state.query.snapshot();
                smallvec![fetch_page(state, descriptor, env)]
            },

            AppAction::PageLoaded { sequence, result, .. } => {
                match state.results.resolve(sequence, result) {
                    Resolution::Applied => {
                        if let Some(error) = state.results.error() {
                            tracing::warn!(%error, sequence, "Page fetch failed");
                            state.notification = Some(format!("Failed to load dogs: {error}"));
                        } else {
                            tracing::debug!(sequence, "Page applied");
                        }
                    },
                    Resolution::Stale => {},
                    Resolution::Unauthenticated => {
                        tracing::debug!(sequence, "Page fetch rejected, session ended");
                    },
                }
                smallvec![Effect::None]
            },

            AppAction::LoadBreeds => {
                if !state.session.is_signed_in() {
                    return smallvec![Effect::None];
                }
                smallvec![load_breeds(state, env)]
            },
            AppAction::BreedsLoaded { epoch, result } => {
                if epoch != state.session_epoch {
                    tracing::debug!(epoch, current = state.session_epoch, "Ignoring breeds from an ended session");
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(breeds) => {
                        tracing::debug!(count = breeds.len(), "Breeds loaded");
                        state.breeds = breeds;
                    },
                    Err(error) => tracing::warn!(%error, "Failed to fetch breeds"),
                }
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}
