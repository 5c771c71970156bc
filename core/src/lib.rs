//! # Starter Core
//!
//! Core traits and types for the starter application's state container.
//!
//! The application state is split into named slices (loading flags,
//! authentication). Each slice is owned by a pure reducer, and slices are
//! composed into one application reducer that a runtime `Store` drives.
//!
//! ## Core Concepts
//!
//! - **State**: Plain owned data for one slice or for the whole application
//! - **Action**: Every input that can change a slice
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Merge**: Explicit shallow merge of a partial update into a slice
//!
//! ## Example
//!
//! ```
//! use starter_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct FlagState {
//!     busy: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum FlagAction {
//!     SetBusy(bool),
//! }
//!
//! struct FlagReducer;
//!
//! impl Reducer for FlagReducer {
//!     type State = FlagState;
//!     type Action = FlagAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FlagState,
//!         action: FlagAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<FlagAction>; 4]> {
//!         match action {
//!             FlagAction::SetBusy(busy) => state.busy = busy,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = FlagState::default();
//! let _ = FlagReducer.reduce(&mut state, FlagAction::SetBusy(true), &());
//! assert!(state.busy);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer composition utilities
pub mod composition;

/// Shallow merge of partial updates into state slices
pub mod merge;

pub use effect::Effect;
pub use merge::Merge;
pub use reducer::Reducer;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for PageReducer {
    ///     type State = PageState;
    ///     type Action = PageAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut PageState,
    ///         action: PageAction,
    ///         _env: &(),
    ///     ) -> SmallVec<[Effect<PageAction>; 4]> {
    ///         match action {
    ///             PageAction::UpdatePageState(patch) => state.merge(patch),
    ///         }
    ///         smallvec![Effect::None]
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
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
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
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

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
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }

        /// Lift an effect over a slice action into an effect over a parent action
        ///
        /// Used when a slice reducer is scoped into the application reducer: every
        /// action the effect eventually produces is wrapped with `f`.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}
