use super::{fetch_page, load_breeds};
use crate::actions::AppAction;
use crate::environment::AppEnvironment;
use crate::state::{AppState, SessionStatus, User};
use crate::storage::USER_KEY;
use pawfetch_catalog::Transport;
use pawfetch_core::environment::KeyValueStore;
use pawfetch_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Session lifecycle
///
/// Also the one place that reacts to an ended session: a session-bound
/// result carrying [`CatalogError::Unauthenticated`](pawfetch_catalog::CatalogError)
/// signs the user out, whichever reducer issued the call. Results stamped
/// with an older [`AppState::session_epoch`] are ignored here, so a late 401
/// from a previous session never ends the current one.
pub struct SessionReducer<T> {
    _transport: PhantomData<fn() -> T>,
}

impl<T> SessionReducer<T> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _transport: PhantomData,
        }
    }
}

impl<T> Default for SessionReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + 'static> Reducer for SessionReducer<T> {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<T>;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment<T>,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        if is_stale(state, &action) {
            tracing::debug!(epoch = ?action.epoch(), current = state.session_epoch, "Ignoring stale result");
            return smallvec![Effect::None];
        }

        if action.is_unauthenticated() && action.epoch().is_some() {
            if state.session.is_signed_in() {
                tracing::info!("Session expired, signing out");
                state.notification = Some("Your session has expired. Please sign in again.".to_string());
            }
            sign_out(state, env);
            return smallvec![Effect::None];
        }

        match action {
            AppAction::RestoreSession => {
                let Some(user) = stored_user(env.storage.as_ref()) else {
                    tracing::info!("No stored user, starting signed out");
                    state.session = SessionStatus::SignedOut;
                    return smallvec![Effect::None];
                };

                let epoch = state.session_epoch;
                let catalog = Arc::clone(&env.catalog);
                smallvec![async_effect! {
                    match catalog.check_session().await {
                        Ok(true) => Some(AppAction::SessionRestored { epoch, user }),
                        Ok(false) => Some(AppAction::SessionRejected { epoch }),
                        Err(error) => {
                            tracing::warn!(%error, "Could not check session");
                            Some(AppAction::SessionRejected { epoch })
                        },
                    }
                }]
            },

            AppAction::SessionRestored { user, .. } => {
                tracing::info!(email = %user.email, "Session restored");
                sign_in(state, user, env)
            },

            AppAction::SessionRejected { .. } => {
                tracing::info!("Stored session rejected");
                sign_out(state, env);
                smallvec![Effect::None]
            },

            AppAction::Login { name, email } => {
                let (name, email) = (name.trim().to_string(), email.trim().to_string());
                if name.is_empty() || email.is_empty() {
                    state.notification = Some("Name and email are required.".to_string());
                    return smallvec![Effect::None];
                }

                let catalog = Arc::clone(&env.catalog);
                smallvec![async_effect! {
                    match catalog.login(&name, &email).await {
                        Ok(()) => Some(AppAction::LoginSucceeded { user: User::new(name, email) }),
                        Err(error) => Some(AppAction::LoginFailed { error }),
                    }
                }]
            },

            AppAction::LoginSucceeded { user } => {
                tracing::info!(email = %user.email, "Signed in");
                match serde_json::to_string(&user) {
                    Ok(json) => {
                        if let Err(error) = env.storage.set(USER_KEY, &json) {
                            tracing::warn!(%error, "Failed to persist user");
                        }
                    },
                    Err(error) => tracing::warn!(%error, "Failed to encode user"),
                }
                sign_in(state, user, env)
            },

            AppAction::LoginFailed { error } => {
                tracing::warn!(%error, "Login failed");
                state.session = SessionStatus::SignedOut;
                state.notification = Some(format!("Login failed: {error}"));
                smallvec![Effect::None]
            },

            AppAction::Logout => {
                if !state.session.is_signed_in() {
                    tracing::debug!("Logout ignored, not signed in");
                    return smallvec![Effect::None];
                }

                let epoch = state.session_epoch;
                let catalog = Arc::clone(&env.catalog);
                smallvec![async_effect! {
                    match catalog.logout().await {
                        Ok(()) => Some(AppAction::LoggedOut { epoch }),
                        Err(error) => Some(AppAction::LogoutFailed { epoch, error }),
                    }
                }]
            },

            AppAction::LoggedOut { .. } => {
                tracing::info!("Signed out");
                sign_out(state, env);
                smallvec![Effect::None]
            },

            AppAction::LogoutFailed { error, .. } => {
                tracing::warn!(%error, "Logout failed, staying signed in");
                state.notification = Some(format!("Logout failed: {error}"));
                smallvec![Effect::None]
            },

            AppAction::DismissNotification => {
                state.notification = None;
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}

/// Whether a session-bound result was overtaken by a newer session, fetch,
/// or match request
fn is_stale(state: &AppState, action: &AppAction) -> bool {
    if action.epoch().is_some_and(|epoch| epoch != state.session_epoch) {
        return true;
    }
    match action {
        AppAction::PageLoaded { sequence, .. } => *sequence != state.results.latest(),
        AppAction::MatchFailed { request, .. } => state.matching.pending_request() != Some(*request),
        _ => false,
    }
}

fn stored_user(storage: &dyn KeyValueStore) -> Option<User> {
    let raw = match storage.get(USER_KEY) {
        Ok(raw) => raw?,
        Err(error) => {
            tracing::warn!(%error, "Failed to read stored user");
            return None;
        },
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(%error, "Ignoring corrupt stored user");
            if let Err(error) = storage.remove(USER_KEY) {
                tracing::warn!(%error, "Failed to remove stored user");
            }
            None
        },
    }
}

fn sign_in<T: Transport + 'static>(
    state: &mut AppState,
    user: User,
    env: &AppEnvironment<T>,
) -> SmallVec<[Effect<AppAction>; 4]> {
    if let Err(error) = state.favorites.initialize(&user.email, env.storage.as_ref()) {
        tracing::warn!(%error, "Failed to load favorites");
    }
    state.session = SessionStatus::SignedIn(user);
    state.session_epoch += 1;
    state.clear_match();

    let descriptor = state.query.snapshot();
    smallvec![Effect::Parallel(vec![
        load_breeds(state, env),
        fetch_page(state, descriptor, env),
    ])]
}

fn sign_out<T>(state: &mut AppState, env: &AppEnvironment<T>) {
    if let Err(error) = env.storage.remove(USER_KEY) {
        tracing::warn!(%error, "Failed to remove stored user");
    }
    state.session = SessionStatus::SignedOut;
    state.session_epoch += 1;
    state.favorites.detach();
    state.results.invalidate();
    state.clear_match();
    state.breeds.clear();
}
