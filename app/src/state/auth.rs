//! Auth-state slice
//!
//! Holds the signed-in user and the bearer token the request coordinator
//! attaches to outbound calls. Besides the generic [`AuthAction::UpdateUserState`]
//! merge, the slice reacts to the three phases of a login.
//!
//! The slice keeps one invariant: `is_authenticated` implies a token is present.

use crate::request::RequestFailure;
use serde::{Deserialize, Serialize};
use starter_core::merge::{Merge, merge_field};
use starter_core::{Effect, Reducer, SmallVec, smallvec};

/// Authentication status of the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// A session is active
    pub is_authenticated: bool,
    /// Opaque user record returned by the backend
    pub user: Option<serde_json::Value>,
    /// Bearer token for outbound requests
    pub token: Option<String>,
    /// A login is in flight
    pub loading: bool,
    /// Failure of the last login
    pub error: Option<RequestFailure>,
}

impl AuthState {
    /// Whether the invariant `is_authenticated => token` holds
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !self.is_authenticated || self.token.is_some()
    }
}

/// A successful login, as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user record
    pub user: serde_json::Value,
    /// Bearer token
    pub token: String,
}

/// Partial update of [`AuthState`]
///
/// Nullable fields take `Option<Option<T>>`: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthPatch {
    /// New `is_authenticated`
    pub is_authenticated: Option<bool>,
    /// New `user`
    pub user: Option<Option<serde_json::Value>>,
    /// New `token`
    pub token: Option<Option<String>>,
    /// New `loading`
    pub loading: Option<bool>,
    /// New `error`
    pub error: Option<Option<RequestFailure>>,
}

impl AuthPatch {
    /// Patch that signs the user out and clears every field
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            is_authenticated: Some(false),
            user: Some(None),
            token: Some(None),
            loading: Some(false),
            error: Some(None),
        }
    }
}

impl Merge for AuthState {
    type Patch = AuthPatch;

    fn merge(&mut self, patch: AuthPatch) {
        merge_field(&mut self.is_authenticated, patch.is_authenticated);
        merge_field(&mut self.user, patch.user);
        merge_field(&mut self.token, patch.token);
        merge_field(&mut self.loading, patch.loading);
        merge_field(&mut self.error, patch.error);
    }
}

/// Actions of the auth slice
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Shallow-merge the patch into the slice
    UpdateUserState(AuthPatch),
    /// A login request started
    LoginPending,
    /// The login request returned a session
    LoginFulfilled(Session),
    /// The login request failed
    LoginRejected(RequestFailure),
}

/// Reducer of the auth slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut AuthState,
        action: AuthAction,
        _env: &(),
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        match action {
            AuthAction::UpdateUserState(patch) => {
                let mut next = state.clone();
                next.merge(patch);

                if next.is_consistent() {
                    *state = next;
                } else {
                    tracing::warn!("Rejected auth update: authenticated without a token");
                }
            },
            AuthAction::LoginPending => {
                state.loading = true;
                state.error = None;
            },
            AuthAction::LoginFulfilled(session) => {
                tracing::debug!("Login succeeded");
                state.loading = false;
                state.is_authenticated = true;
                state.user = Some(session.user);
                state.token = Some(session.token);
                state.error = None;
            },
            AuthAction::LoginRejected(failure) => {
                tracing::debug!(kind = failure.kind.name(), "Login failed");
                state.loading = false;
                state.is_authenticated = false;
                state.user = None;
                state.token = None;
                state.error = Some(failure);
            },
        }
        smallvec![Effect::None]
    }
}
