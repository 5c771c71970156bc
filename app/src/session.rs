//! Login flow
//!
//! The only auth-changing operation: exchanges credentials for a session and
//! drives the auth slice through pending, then fulfilled or rejected.

use crate::api;
use crate::request::{RequestCoordinator, RequestData, RequestDescriptor, RequestFailure};
use crate::state::auth::{AuthAction, Session};
use crate::state::{AppAction, AppStore};
use starter_http::{HttpMethod, Transport};

/// Log in with the given credentials
///
/// Dispatches `LoginPending`, posts the credentials to the login endpoint with
/// the auth-form loader, and dispatches `LoginFulfilled` or `LoginRejected`
/// with the outcome. The same outcome is returned to the caller.
///
/// # Errors
///
/// Returns the normalized failure of the login request, or a decode failure
/// (carrying the response status and body) when the response is not a
/// `{ user, token }` session.
#[tracing::instrument(skip_all, name = "login_user")]
pub async fn login_user<T: Transport>(
    store: &AppStore,
    coordinator: &RequestCoordinator<T>,
    credentials: RequestData,
) -> Result<Session, RequestFailure> {
    dispatch(store, AuthAction::LoginPending).await;

    let descriptor = RequestDescriptor::new(api::auth::LOGIN)
        .with_method(HttpMethod::Post)
        .with_data(credentials)
        .with_auth_loader(true);

    let result: Result<Session, RequestFailure> = coordinator.execute_json(descriptor, store).await;

    match &result {
        Ok(session) => {
            tracing::info!("Logged in");
            dispatch(store, AuthAction::LoginFulfilled(session.clone())).await;
        },
        Err(failure) => {
            tracing::info!(kind = failure.name(), "Login rejected");
            dispatch(store, AuthAction::LoginRejected(failure.clone())).await;
        },
    }

    result
}

async fn dispatch(store: &AppStore, action: AuthAction) {
    if let Err(error) = store.send(AppAction::Auth(action)).await {
        tracing::warn!(%error, "Auth state update dropped");
    }
}
