//! Reducer composition utilities
//!
//! This module provides utilities for composing slice reducers into one
//! application reducer:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a slice reducer on one field of a parent state,
//!   translating between the parent action and the slice action
//!
//! # Examples
//!
//! ```
//! use starter_core::{Effect, Reducer, SmallVec, smallvec};
//! use starter_core::composition::{combine_reducers, scope_reducer};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counter, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct AppState {
//!     left: Counter,
//!     right: Counter,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Left(CounterAction),
//!     Right(CounterAction),
//! }
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.left,
//!         |a| match a { AppAction::Left(a) => Some(a), AppAction::Right(_) => None },
//!         AppAction::Left,
//!     )),
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |s: &mut AppState| &mut s.right,
//!         |a| match a { AppAction::Right(a) => Some(a), AppAction::Left(_) => None },
//!         AppAction::Right,
//!     )),
//! ]);
//!
//! let mut state = AppState::default();
//! let _ = app.reduce(&mut state, AppAction::Left(CounterAction::Increment), &());
//! assert_eq!(state.left.count, 1);
//! assert_eq!(state.right.count, 0);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer that can be shared with the runtime across tasks.
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
/// Effects that do nothing are dropped so a combined reducer reports only the
/// work its parts actually requested.
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
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined
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
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        all_effects
    }
}

/// Scopes a slice reducer to one field of a larger state.
///
/// - `state`: lens from the parent state to the slice (mutated in place)
/// - `to_local`: extracts the slice action from a parent action; parent actions
///   that do not belong to the slice are ignored
/// - `to_global`: wraps actions produced by the slice's effects back into the
///   parent action type
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `SubS`: The slice state type
/// - `A`: The parent action type
/// - `SubA`: The slice action type
/// - `E`: The environment type (shared)
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    to_local: fn(A) -> Option<SubA>,
    to_global: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        to_local,
        to_global,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on one slice of a parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    to_local: fn(A) -> Option<SubA>,
    to_global: fn(SubA) -> A,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    A: Send + 'static,
    SubA: Send + 'static,
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
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
        let Some(local) = (self.to_local)(action) else {
            return SmallVec::new();
        };

        let slice = (self.state)(state);
        let to_global = self.to_global;

        self.reducer
            .reduce(slice, local, env)
            .into_iter()
            .map(|effect| effect.map(to_global))
            .collect()
    }
}
