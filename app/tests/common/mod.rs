//! Shared fixtures for the app integration tests

#![allow(dead_code)] // Not every suite uses every helper

use serde_json::Value;
use starter_app::state::AppAction;
use starter_app::state::page::{PageAction, PagePatch};
use starter_app::{AppStore, ClientConfig, RequestCoordinator, RequestData, build_store};
use starter_testing::MockTransport;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// JSON object literal as request data
pub fn data(value: Value) -> RequestData {
    match value {
        Value::Object(map) => map,
        _ => RequestData::new(),
    }
}

/// Store, coordinator over `transport`, and a recorder of every store action
pub fn harness(
    transport: MockTransport,
    config: ClientConfig,
) -> (AppStore, RequestCoordinator<MockTransport>, broadcast::Receiver<AppAction>) {
    starter_testing::init_tracing();
    let store = build_store();
    let actions = store.subscribe_actions();
    let coordinator = RequestCoordinator::new(transport, config);
    (store, coordinator, actions)
}

/// Every action the store processed so far
pub fn drain(actions: &mut broadcast::Receiver<AppAction>) -> Vec<AppAction> {
    let mut seen = Vec::new();
    loop {
        match actions.try_recv() {
            Ok(action) => seen.push(action),
            Err(TryRecvError::Lagged(_)) => {},
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    seen
}

/// The loading-slice patches among `actions`
pub fn page_patches(actions: &[AppAction]) -> Vec<PagePatch> {
    actions
        .iter()
        .filter_map(|action| match action {
            AppAction::Page(PageAction::UpdatePageState(patch)) => Some(patch.clone()),
            AppAction::Auth(_) => None,
        })
        .collect()
}
