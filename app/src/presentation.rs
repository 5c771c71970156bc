//! Full-screen page loader
//!
//! A view model for the page loader: given the loading slice it says whether a
//! spinner should be shown and with what text. Rendering the spinner itself
//! belongs to the UI layer.

use crate::state::AppState;
use crate::state::page::{DEFAULT_PAGE_LOADER_TEXT, PageState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spinner size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerSize {
    /// Inline
    Small,
    /// Inside a card or modal
    Medium,
    /// Full screen
    Large,
}

/// A spinner the UI layer should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingSpinner {
    /// Caption under the spinner
    pub text: String,
    /// Size
    pub size: SpinnerSize,
    /// Cover the whole viewport
    pub full_screen: bool,
}

/// The page loader view
#[derive(Debug, Clone, Copy, Default)]
pub struct PageLoader;

impl PageLoader {
    /// Spinner to show for this loading state, `None` when the page is idle
    ///
    /// An empty loader text falls back to `"Loading..."`.
    #[must_use]
    pub fn render(page: &PageState) -> Option<LoadingSpinner> {
        if !page.page_loading {
            return None;
        }

        let text = if page.page_loader_text.is_empty() {
            DEFAULT_PAGE_LOADER_TEXT.to_string()
        } else {
            page.page_loader_text.clone()
        };

        Some(LoadingSpinner {
            text,
            size: SpinnerSize::Large,
            full_screen: true,
        })
    }

    /// Re-render whenever the store publishes a snapshot
    ///
    /// `on_render` is called once with the current view, then each time the view
    /// changes. The task ends when the store is dropped.
    pub fn follow<F>(mut snapshots: watch::Receiver<AppState>, mut on_render: F) -> JoinHandle<()>
    where
        F: FnMut(Option<LoadingSpinner>) + Send + 'static,
    {
        tokio::spawn(async move {
            let mut current = Self::render(&snapshots.borrow_and_update().page);
            on_render(current.clone());

            while snapshots.changed().await.is_ok() {
                let next = Self::render(&snapshots.borrow_and_update().page);
                if next != current {
                    on_render(next.clone());
                    current = next;
                }
            }
        })
    }
}
