//! Reducer composition utilities
//!
//! A feature is usually easier to read as several small reducers that share
//! one state and one action type: one owns the session lifecycle, one owns
//! the search query and its results, one owns favorites. [`combine_reducers`]
//! runs each of them on every action and concatenates their effects.
//!
//! # Examples
//!
//! ```
//! use pawfetch_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//! use pawfetch_core::composition::combine_reducers;
//!
//! #[derive(Clone, Default)]
//! struct BrowseState {
//!     page: u32,
//!     starred: Vec<String>,
//! }
//!
//! #[derive(Clone)]
//! enum BrowseAction {
//!     NextPage,
//!     Star(String),
//! }
//!
//! struct PagingReducer;
//! struct StarReducer;
//!
//! impl Reducer for PagingReducer {
//!     type State = BrowseState;
//!     type Action = BrowseAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut BrowseState, action: BrowseAction, _env: &()) -> SmallVec<[Effect<BrowseAction>; 4]> {
//!         if matches!(action, BrowseAction::NextPage) {
//!             state.page += 1;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for StarReducer {
//!     type State = BrowseState;
//!     type Action = BrowseAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut BrowseState, action: BrowseAction, _env: &()) -> SmallVec<[Effect<BrowseAction>; 4]> {
//!         if let BrowseAction::Star(id) = action {
//!             state.starred.push(id);
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let combined = combine_reducers(vec![Box::new(PagingReducer), Box::new(StarReducer)]);
//!
//! let mut state = BrowseState { page: 1, starred: Vec::new() };
//! let _ = combined.reduce(&mut state, BrowseAction::NextPage, &());
//! let _ = combined.reduce(&mut state, BrowseAction::Star("d1".to_string()), &());
//! assert_eq!(state.page, 2);
//! assert_eq!(state.starred, vec!["d1".to_string()]);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer that can be shared with the runtime's effect tasks.
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in the order given, and all effects are collected and
/// concatenated. Later reducers observe the state changes made by earlier
/// ones for the same action.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination holds no reducers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}
