//! Loading-state slice
//!
//! Four independent flags the view layer reads to decide which loader to show.
//! The slice has a single mutator, a shallow merge of a [`PagePatch`], and does
//! no validation of its own.

use serde::{Deserialize, Serialize};
use starter_core::merge::{Merge, merge_field};
use starter_core::{Effect, Reducer, SmallVec, smallvec};

/// Text shown by the page loader when nothing more specific is set
pub const DEFAULT_PAGE_LOADER_TEXT: &str = "Loading...";

/// Loading flags for the page, modals and auth forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Full-screen page loader visible
    pub page_loading: bool,
    /// Text under the page loader
    pub page_loader_text: String,
    /// Modal loader visible
    pub modal_loading: bool,
    /// Auth-form loader visible
    pub auth_loading: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_loading: false,
            page_loader_text: DEFAULT_PAGE_LOADER_TEXT.to_string(),
            modal_loading: false,
            auth_loading: false,
        }
    }
}

/// Partial update of [`PageState`]; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    /// New `page_loading`
    pub page_loading: Option<bool>,
    /// New `page_loader_text`
    pub page_loader_text: Option<String>,
    /// New `modal_loading`
    pub modal_loading: Option<bool>,
    /// New `auth_loading`
    pub auth_loading: Option<bool>,
}

impl PagePatch {
    /// Patch that only sets `page_loading`
    #[must_use]
    pub fn page_loading(value: bool) -> Self {
        Self {
            page_loading: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only sets `modal_loading`
    #[must_use]
    pub fn modal_loading(value: bool) -> Self {
        Self {
            modal_loading: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only sets `auth_loading`
    #[must_use]
    pub fn auth_loading(value: bool) -> Self {
        Self {
            auth_loading: Some(value),
            ..Self::default()
        }
    }

    /// Also set `page_loader_text`
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.page_loader_text = Some(text.into());
        self
    }
}

impl Merge for PageState {
    type Patch = PagePatch;

    fn merge(&mut self, patch: PagePatch) {
        merge_field(&mut self.page_loading, patch.page_loading);
        merge_field(&mut self.page_loader_text, patch.page_loader_text);
        merge_field(&mut self.modal_loading, patch.modal_loading);
        merge_field(&mut self.auth_loading, patch.auth_loading);
    }
}

/// Actions of the loading-state slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Shallow-merge the patch into the slice
    UpdatePageState(PagePatch),
}

/// Reducer of the loading-state slice
#[derive(Debug, Clone, Copy, Default)]
pub struct PageReducer;

impl Reducer for PageReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        _env: &(),
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        match action {
            PageAction::UpdatePageState(patch) => {
                tracing::debug!(?patch, "Updating page state");
                state.merge(patch);
            },
        }
        smallvec![Effect::None]
    }
}
