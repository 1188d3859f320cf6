//! Given-When-Then harness for reducers
//!
//! Drives a reducer synchronously, without a runtime, and hands the resulting
//! state and effect descriptions to assertion closures. Effects are never
//! executed here; timer behaviour belongs in `Store` tests.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use shield_point_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;

type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers
///
/// Actions given through [`ReducerTest::given_actions`] are applied first and
/// their effects discarded. Only the effects of the action under test are
/// passed to [`ReducerTest::then_effects`].
///
/// # Example
///
/// ```ignore
/// use shield_point_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(AppReducer::new())
///     .with_env(test_environment())
///     .given_state(AppState::default())
///     .given_actions([AppAction::AddToCart { product_id: "1".into(), quantity: 2 }])
///     .when_action(AppAction::Checkout)
///     .then_state(|state| assert_eq!(state.ledger.len(), 1))
///     .then_effects(assertions::assert_has_delay_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    setup_actions: Vec<A>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            setup_actions: Vec::new(),
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Apply these actions before the action under test (Given)
    #[must_use]
    pub fn given_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.setup_actions.extend(actions);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the action under test (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the reducer and every assertion
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertion fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let action = self.action.expect("Action must be set with when_action()");
        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        for setup in self.setup_actions {
            let _ = self.reducer.reduce(&mut state, setup, &env);
        }

        let effects = self.reducer.reduce(&mut state, action, &env);

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
///
/// The `has_*` helpers look through `Parallel`, `Sequential` and
/// `Cancellable` wrappers.
pub mod assertions {
    use shield_point_core::effect::{Effect, EffectId};
    use std::time::Duration;

    fn any_effect<A>(effects: &[Effect<A>], predicate: &dyn Fn(&Effect<A>) -> bool) -> bool {
        effects.iter().any(|effect| {
            predicate(effect)
                || match effect {
                    Effect::Parallel(inner) | Effect::Sequential(inner) => {
                        any_effect(inner, predicate)
                    },
                    Effect::Cancellable { effect, .. } => {
                        any_effect(std::slice::from_ref(effect.as_ref()), predicate)
                    },
                    _ => false,
                }
        })
    }

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect other than `Effect::None` is present.
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of top-level effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            any_effect(effects, &|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain at least one Delay effect
    ///
    /// # Panics
    ///
    /// Panics if no Delay effect is found.
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            any_effect(effects, &|e| matches!(e, Effect::Delay { .. })),
            "Expected at least one Delay effect, but none found"
        );
    }

    /// Assert that a delay of exactly `duration` is scheduled under `id`
    ///
    /// # Panics
    ///
    /// Panics if no such cancellable delay is found.
    pub fn assert_has_cancellable_delay<A>(effects: &[Effect<A>], id: &str, duration: Duration) {
        let found = any_effect(effects, &|e| match e {
            Effect::Cancellable { id: group, effect } => {
                group.as_str() == id
                    && matches!(effect.as_ref(), Effect::Delay { duration: d, .. } if *d == duration)
            },
            _ => false,
        });
        assert!(
            found,
            "Expected a {duration:?} delay cancellable under {id:?}, but none found"
        );
    }

    /// Assert that effects cancel the group `id`
    ///
    /// # Panics
    ///
    /// Panics if no matching Cancel effect is found.
    pub fn assert_has_cancel_effect<A>(effects: &[Effect<A>], id: &str) {
        let wanted = EffectId::new(id.to_owned());
        assert!(
            any_effect(effects, &|e| matches!(e, Effect::Cancel(group) if *group == wanted)),
            "Expected Effect::Cancel({id:?}), but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_point_core::effect::EffectId;
    use shield_point_core::{SmallVec, smallvec};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    struct BeaconState {
        lit: bool,
        flashes: u32,
    }

    #[derive(Clone, Debug)]
    enum BeaconAction {
        Light,
        Flash,
        Dim,
    }

    struct BeaconReducer;

    impl Reducer for BeaconReducer {
        type State = BeaconState;
        type Action = BeaconAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut BeaconState,
            action: BeaconAction,
            _env: &(),
        ) -> SmallVec<[Effect<BeaconAction>; 4]> {
            match action {
                BeaconAction::Light => {
                    state.lit = true;
                    smallvec![Effect::merge(vec![
                        Effect::Delay {
                            duration: Duration::from_secs(3),
                            action: Box::new(BeaconAction::Dim),
                        }
                        .cancellable(EffectId::new("beacon")),
                    ])]
                },
                BeaconAction::Flash => {
                    state.flashes += 1;
                    smallvec![Effect::None]
                },
                BeaconAction::Dim => {
                    state.lit = false;
                    smallvec![Effect::Cancel(EffectId::new("beacon"))]
                },
            }
        }
    }

    fn dark() -> BeaconState {
        BeaconState {
            lit: false,
            flashes: 0,
        }
    }

    #[test]
    fn finds_delays_nested_in_wrappers() {
        ReducerTest::new(BeaconReducer)
            .with_env(())
            .given_state(dark())
            .when_action(BeaconAction::Light)
            .then_state(|state| assert!(state.lit))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
                assertions::assert_has_cancellable_delay(effects, "beacon", Duration::from_secs(3));
            })
            .run();
    }

    #[test]
    fn setup_actions_are_applied_first() {
        ReducerTest::new(BeaconReducer)
            .with_env(())
            .given_state(dark())
            .given_actions([BeaconAction::Flash, BeaconAction::Light])
            .when_action(BeaconAction::Flash)
            .then_state(|state| {
                assert!(state.lit);
                assert_eq!(state.flashes, 2);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn cancel_assertion_matches_group() {
        ReducerTest::new(BeaconReducer)
            .with_env(())
            .given_state(dark())
            .when_action(BeaconAction::Dim)
            .then_effects(|effects| assertions::assert_has_cancel_effect(effects, "beacon"))
            .run();
    }

    #[test]
    #[should_panic(expected = "Expected at least one Future effect")]
    fn missing_future_is_reported() {
        assertions::assert_has_future_effect::<BeaconAction>(&[Effect::None]);
    }
}
