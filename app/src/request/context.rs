use crate::state::page::{PageAction, PagePatch};
use crate::state::{AppAction, AppStore};
use std::future::Future;

/// What the coordinator needs from the store
///
/// Reading the bearer token and updating the loading slice are the only two
/// store operations a request performs.
pub trait RequestContext: Send + Sync {
    /// Current bearer token, if any
    fn bearer_token(&self) -> impl Future<Output = Option<String>> + Send;

    /// Shallow-merge a patch into the loading slice
    fn update_page_state(&self, patch: PagePatch) -> impl Future<Output = ()> + Send;
}

impl RequestContext for AppStore {
    async fn bearer_token(&self) -> Option<String> {
        self.state(|s| s.auth.token.clone()).await
    }

    async fn update_page_state(&self, patch: PagePatch) {
        if let Err(error) = self
            .send(AppAction::Page(PageAction::UpdatePageState(patch)))
            .await
        {
            tracing::warn!(%error, "Loading state update dropped");
        }
    }
}
