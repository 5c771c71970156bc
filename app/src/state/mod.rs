//! Application state
//!
//! The store holds two slices, `page` (loading flags) and `auth`. Each slice
//! has its own reducer; [`AppReducer`] scopes both into the application action
//! type so one `send` reaches exactly one slice.
//!
//! Reading a slice is typed field access on the snapshot
//! (`store.state(|s| s.page.clone())`); updating one is dispatching its update
//! action with a patch.

pub mod auth;
pub mod page;

use auth::{AuthAction, AuthReducer, AuthState};
use page::{PageAction, PageReducer, PageState};
use serde::{Deserialize, Serialize};
use starter_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use starter_core::{Effect, Reducer, SmallVec};
use starter_runtime::Store;

/// State of the whole application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Loading flags
    pub page: PageState,
    /// Authentication
    pub auth: AuthState,
}

/// Every action the store accepts
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Loading-state slice action
    Page(PageAction),
    /// Auth slice action
    Auth(AuthAction),
}

impl AppAction {
    /// The page action, if this is one
    #[must_use]
    pub fn into_page(self) -> Option<PageAction> {
        match self {
            Self::Page(action) => Some(action),
            Self::Auth(_) => None,
        }
    }

    /// The auth action, if this is one
    #[must_use]
    pub fn into_auth(self) -> Option<AuthAction> {
        match self {
            Self::Auth(action) => Some(action),
            Self::Page(_) => None,
        }
    }
}

fn page_slice(state: &mut AppState) -> &mut PageState {
    &mut state.page
}

fn auth_slice(state: &mut AppState) -> &mut AuthState {
    &mut state.auth
}

/// The application reducer: both slices, each scoped to its own field
pub struct AppReducer {
    slices: CombinedReducer<AppState, AppAction, ()>,
}

impl AppReducer {
    /// Compose the slice reducers
    #[must_use]
    pub fn new() -> Self {
        Self {
            slices: combine_reducers(vec![
                Box::new(scope_reducer(PageReducer, page_slice, AppAction::into_page, AppAction::Page)),
                Box::new(scope_reducer(AuthReducer, auth_slice, AppAction::into_auth, AppAction::Auth)),
            ]),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &(),
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        self.slices.reduce(state, action, env)
    }
}

/// The application store
pub type AppStore = Store<AppState, AppAction, (), AppReducer>;

/// Create the application store with initial state
#[must_use]
pub fn build_store() -> AppStore {
    build_store_with(AppState::default())
}

/// Create the application store from existing state (e.g. a restored auth slice)
#[must_use]
pub fn build_store_with(state: AppState) -> AppStore {
    Store::new(state, AppReducer::new(), ())
}
