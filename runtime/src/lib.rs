//! # Starter Runtime
//!
//! Runtime for the starter state container.
//!
//! This crate provides the Store that owns the application state, runs
//! reducers, publishes snapshots to subscribers and executes effects.
//!
//! ## Core Components
//!
//! - **Store**: Owns state and serializes every mutation through the reducer
//! - **Subscriptions**: A `watch` channel of state snapshots and a `broadcast`
//!   channel of processed actions, both published before `send` returns
//! - **Effect Executor**: Executes effect descriptions and feeds produced
//!   actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use starter_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use starter_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default().with_broadcast_capacity(256);
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of processed actions buffered for slow action subscribers
    pub broadcast_capacity: usize,
    /// How often `shutdown` re-checks the pending effect count
    pub shutdown_poll_interval: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the shutdown poll interval
    #[must_use]
    pub const fn with_shutdown_poll_interval(mut self, interval: Duration) -> Self {
        self.shutdown_poll_interval = interval;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            shutdown_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// that action to complete.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and its internal tracking counterpart
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects from this action still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime owner of application state
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (all state transitions)
    /// 3. Environment (injected dependencies)
    /// 4. Subscribers (snapshots and processed actions)
    /// 5. Effect execution (with feedback loop)
    ///
    /// Every `send` is one atomic mutation: the reducer runs under the write
    /// lock, and the resulting snapshot and the action itself are published to
    /// subscribers before the lock is released. There is no multi-action
    /// transaction.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        shutdown_poll_interval: Duration,
        /// Latest state snapshot, replaced after every reduction.
        snapshots: Arc<watch::Sender<S>>,
        /// Every processed action, in reduction order.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (snapshots, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                shutdown_poll_interval: config.shutdown_poll_interval,
                snapshots: Arc::new(snapshots),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Publishes the new snapshot and the action to subscribers
        /// 4. Starts executing returned effects asynchronously
        ///
        /// The mutation is visible to `state()` as soon as this returns; effects
        /// may still be running.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates to the caller.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::trace!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let observed = (self.action_broadcast.receiver_count() > 0).then(|| action.clone());

                let effects = self.reducer.reduce(&mut state, action, &self.environment);

                self.snapshots.send_replace(state.clone());
                if let Some(action) = observed {
                    let _ = self.action_broadcast.send(action);
                }

                tracing::trace!(effects = effects.len(), "Reducer completed");
                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let token = store.state(|s| s.auth.token.clone()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Clone the current state
        pub async fn snapshot(&self) -> S {
            self.state(S::clone).await
        }

        /// Subscribe to state snapshots
        ///
        /// The receiver always holds the latest snapshot; intermediate snapshots
        /// may be skipped by a slow reader. Use [`Store::subscribe_actions`] to
        /// observe every transition.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.snapshots.subscribe()
        }

        /// Subscribe to every action processed by the store
        ///
        /// Actions are published in the order the reducer processed them,
        /// including actions fed back by effects.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// pending effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let deadline = tokio::time::Instant::now() + timeout;

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if tokio::time::Instant::now() >= deadline {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(self.shutdown_poll_interval).await;
            }
        }

        /// Start tracking one spawned effect
        fn track(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            (
                DecrementGuard(tracking.clone()),
                AtomicCounterGuard(Arc::clone(&self.pending_effects)),
            )
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// Effect failures are logged and never halt the store. The guards keep
        /// the counters correct even if an effect panics.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into spawned tasks
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guards = self.track(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let guards = self.track(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        tokio::time::sleep(duration).await;
                        if let Err(error) = store.send(*action).await {
                            tracing::warn!(%error, "Dropped delayed action");
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    let guards = self.track(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        for effect in effects {
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect_internal(effect, step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                shutdown_poll_interval: self.shutdown_poll_interval,
                snapshots: Arc::clone(&self.snapshots),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use starter_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceParallelEffects => smallvec![Effect::Parallel(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                ])],
                TestAction::ProducePanickingEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        panic!("Intentional panic in effect for testing");
                    }))]
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = test_store();

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_send_action_is_visible_immediately() {
        let store = test_store();

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_multiple_actions() {
        let store = test_store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        assert_eq!(store.snapshot().await.value, 1);
    }

    #[tokio::test]
    async fn test_effect_none() {
        let store = test_store();

        let handle = store.send(TestAction::NoOp).await.unwrap();
        assert_eq!(handle.pending(), 0);
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_future_effect_feeds_back() {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceEffect).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_effect() {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_parallel_effects() {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_sequential_effects_run_in_order() {
        let store = test_store();
        let mut actions = store.subscribe_actions();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(action) = actions.try_recv() {
            seen.push(action);
        }
        assert_eq!(
            seen,
            vec![
                TestAction::ProduceSequentialEffects,
                TestAction::Increment,
                TestAction::Increment,
                TestAction::Decrement,
            ]
        );
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_panicking_effect_does_not_halt_store() {
        let store = test_store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_subscribe_sees_latest_snapshot() {
        let store = test_store();
        let mut snapshots = store.subscribe();

        let _ = store.send(TestAction::Increment).await;

        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().value, 1);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = test_store();

        store.shutdown(Duration::from_millis(10)).await.unwrap();

        let result = store.send(TestAction::Increment).await;
        assert_eq!(result.unwrap_err(), StoreError::ShutdownInProgress);
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[test]
    fn test_completed_handle() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        tokio_test::block_on(handle.wait());
    }

    proptest::proptest! {
        #[test]
        fn snapshot_and_action_stream_follow_every_send(steps in proptest::collection::vec(proptest::bool::ANY, 0..50)) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

            let (value, snapshot, seen) = runtime.block_on(async {
                let store = test_store();
                let snapshots = store.subscribe();
                let mut actions = store.subscribe_actions();

                for &up in &steps {
                    let action = if up { TestAction::Increment } else { TestAction::Decrement };
                    let _ = store.send(action).await;
                }

                let mut seen = Vec::new();
                while let Ok(action) = actions.try_recv() {
                    seen.push(action);
                }
                let snapshot = snapshots.borrow().value;
                (store.state(|s| s.value).await, snapshot, seen)
            });

            let expected: Vec<TestAction> = steps
                .iter()
                .map(|&up| if up { TestAction::Increment } else { TestAction::Decrement })
                .collect();
            let sum: i32 = steps.iter().map(|&up| if up { 1 } else { -1 }).sum();

            proptest::prop_assert_eq!(value, sum);
            proptest::prop_assert_eq!(snapshot, sum);
            proptest::prop_assert_eq!(seen, expected);
        }
    }
}
