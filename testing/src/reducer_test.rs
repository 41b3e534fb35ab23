//! Given-When-Then harness for reducers
//!
//! A test sets up a state and environment, applies one or more actions, and
//! checks the resulting state and effects. [`resolve_effects`] then runs the
//! returned effects so their feedback actions can be asserted as well.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use pawfetch_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Reducer harness
///
/// Actions given with [`when_action`](Self::when_action) or
/// [`when_actions`](Self::when_actions) are reduced in order against the same
/// state; the effect checks see the effects of every action, concatenated.
///
/// # Example
///
/// ```ignore
/// use pawfetch_testing::ReducerTest;
///
/// let effects = ReducerTest::new(SearchReducer::new())
///     .with_env(test_environment())
///     .given_state(signed_in_state())
///     .when_actions([AppAction::NextPage, AppAction::NextPage])
///     .then_state(|state| assert_eq!(state.query.page(), 3))
///     .run();
///
/// let feedback = pawfetch_testing::resolve_effects(effects).await;
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test of `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment the reducer runs against
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Starting state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append one action (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Append several actions, reduced in iteration order (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Check the final state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the produced effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Reduce every action, run the checks, and hand back the effects
    ///
    /// # Panics
    ///
    /// Panics if the state, environment, or at least one action is missing,
    /// or if a check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) -> Vec<Effect<A>> {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects.extend(self.reducer.reduce(&mut state, action, &env));
        }

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&effects);
        }

        effects
    }
}

/// Await every effect and collect the actions they feed back
///
/// `Parallel` children are awaited one after another, in order, so the
/// result is deterministic. Feedback actions are not reduced.
pub async fn resolve_effects<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
    let mut pending: Vec<Effect<A>> = effects.into_iter().collect();
    pending.reverse();

    let mut actions = Vec::new();
    while let Some(effect) = pending.pop() {
        match effect {
            Effect::None => {},
            Effect::Future(future) => actions.extend(future.await),
            Effect::Parallel(children) => pending.extend(children.into_iter().rev()),
        }
    }
    actions
}

/// Helper assertions for effects
pub mod assertions {
    use pawfetch_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect, directly or
    /// inside `Parallel`
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            count_future_effects(effects) > 0,
            "Expected at least one Future effect, but none found"
        );
    }

    /// Count the Future effects, looking inside `Parallel`
    #[must_use]
    pub fn count_future_effects<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .map(|effect| match effect {
                Effect::None => 0,
                Effect::Future(_) => 1,
                Effect::Parallel(children) => count_future_effects(children),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawfetch_core::effect::Effect;
    use pawfetch_core::reducer::Reducer;
    use pawfetch_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct PagerState {
        page: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum PagerAction {
        Next,
        Previous,
        Load,
        Loaded(u32),
    }

    struct Pager;

    impl Reducer for Pager {
        type State = PagerState;
        type Action = PagerAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut PagerState,
            action: PagerAction,
            _env: &(),
        ) -> SmallVec<[Effect<PagerAction>; 4]> {
            match action {
                PagerAction::Next => {
                    state.page += 1;
                    smallvec![Effect::None]
                },
                PagerAction::Previous => {
                    state.page = state.page.saturating_sub(1).max(1);
                    smallvec![Effect::None]
                },
                PagerAction::Load => {
                    let page = state.page;
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async move { Some(PagerAction::Loaded(page)) })),
                        Effect::None,
                        Effect::Future(Box::pin(async move { Some(PagerAction::Loaded(page + 1)) })),
                    ])]
                },
                PagerAction::Loaded(_) => smallvec![Effect::None],
            }
        }
    }

    #[test]
    fn test_single_action() {
        ReducerTest::new(Pager)
            .with_env(())
            .given_state(PagerState { page: 1 })
            .when_action(PagerAction::Next)
            .then_state(|state| assert_eq!(state.page, 2))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn test_actions_reduce_in_order() {
        ReducerTest::new(Pager)
            .with_env(())
            .given_state(PagerState { page: 1 })
            .when_actions([PagerAction::Previous, PagerAction::Next, PagerAction::Next])
            .then_state(|state| assert_eq!(state.page, 3))
            .then_effects(|effects| assertions::assert_effects_count(effects, 3))
            .run();
    }

    #[test]
    fn test_count_future_effects_descends_into_parallel() {
        ReducerTest::new(Pager)
            .with_env(())
            .given_state(PagerState { page: 1 })
            .when_action(PagerAction::Load)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert_eq!(assertions::count_future_effects(effects), 2);
            })
            .run();
    }

    #[tokio::test]
    async fn test_resolve_effects_collects_feedback_in_order() {
        let effects = ReducerTest::new(Pager)
            .with_env(())
            .given_state(PagerState { page: 4 })
            .when_action(PagerAction::Load)
            .run();

        let feedback = resolve_effects(effects).await;
        assert_eq!(feedback, vec![PagerAction::Loaded(4), PagerAction::Loaded(5)]);
    }

    #[test]
    #[should_panic(expected = "At least one action")]
    fn test_missing_action_panics() {
        ReducerTest::new(Pager)
            .with_env(())
            .given_state(PagerState { page: 1 })
            .run();
    }
}
