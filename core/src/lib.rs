//! # Pawfetch Core
//!
//! Core traits and types shared by every pawfetch crate.
//!
//! The browsing client is written as a reducer over explicit state: every
//! user intent (pick a breed, flip the sort, go to the next page, star a
//! dog) is an action, and every bit of I/O the reducer wants performed is
//! returned as an [`Effect`](effect::Effect) description for the runtime to
//! execute.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable data for a feature (query, results, favorites)
//! - **Action**: All possible inputs to a reducer (user intents and effect results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected capabilities such as the [`KeyValueStore`](environment::KeyValueStore)
//!
//! ## Example
//!
//! ```
//! use pawfetch_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct PagerState {
//!     page: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum PagerAction {
//!     Next,
//!     Previous,
//! }
//!
//! struct PagerReducer;
//!
//! impl Reducer for PagerReducer {
//!     type State = PagerState;
//!     type Action = PagerAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PagerState,
//!         action: PagerAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<PagerAction>; 4]> {
//!         match action {
//!             PagerAction::Next => state.page += 1,
//!             PagerAction::Previous => state.page = state.page.saturating_sub(1).max(1),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = PagerState { page: 1 };
//! let _ = PagerReducer.reduce(&mut state, PagerAction::Previous, &());
//! assert_eq!(state.page, 1);
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for constructing effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SearchReducer {
    ///     type State = AppState;
    ///     type Action = AppAction;
    ///     type Environment = AppEnvironment<T>;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AppState,
    ///         action: AppAction,
    ///         env: &AppEnvironment<T>,
    ///     ) -> SmallVec<[Effect<AppAction>; 4]> {
    ///         match action {
    ///             AppAction::NextPage => {
    ///                 let change = state.query.next_page();
    ///                 // hand the new descriptor to the result coordinator
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// There is deliberately no cancellation variant: a superseded catalog
    /// request is allowed to finish and its result is dropped by the reducer
    /// that owns the sequence number.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external capabilities are abstracted behind traits and injected
/// via the Environment parameter, so reducers can be tested with in-memory
/// implementations.
pub mod environment {
    use thiserror::Error;

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// The backing medium could not be read or written
        #[error("Storage I/O failed: {0}")]
        Io(String),

        /// A stored value could not be decoded
        #[error("Stored value for '{key}' is corrupt: {reason}")]
        Corrupt {
            /// Key whose value failed to decode
            key: String,
            /// Decoder message
            reason: String,
        },
    }

    /// Durable named string values, the way a browser's local storage works.
    ///
    /// Values survive process restarts. Absence is a normal state: `get`
    /// returns `Ok(None)` for a key that was never written.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// storage.set("user", r#"{"name":"Ada","email":"ada@example.com"}"#)?;
    /// assert!(storage.get("user")?.is_some());
    /// storage.remove("user")?;
    /// ```
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the backing medium is unreadable.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the write cannot be made durable.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove `key`; removing a missing key is not an error
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the write cannot be made durable.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded,
    }

    #[test]
    fn test_none_effects_are_none() {
        let effect: Effect<TestAction> =
            Effect::merge(vec![Effect::None, Effect::Parallel(vec![Effect::None])]);
        assert!(effect.is_none());
    }

    #[test]
    fn test_future_effect_is_not_none() {
        let effect = Effect::merge(vec![
            Effect::None,
            Effect::Future(Box::pin(async { Some(TestAction::Loaded) })),
        ]);
        assert!(!effect.is_none());
        assert_eq!(
            format!("{effect:?}"),
            "Effect::Parallel([Effect::None, Effect::Future(<future>)])"
        );
    }
}
