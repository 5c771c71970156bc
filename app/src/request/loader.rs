use super::descriptor::RequestDescriptor;
use crate::state::page::PagePatch;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The loader flag a request raises while in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderCategory {
    /// `modal_loading`
    Modal,
    /// `auth_loading`
    Auth,
    /// `page_loading`, with loader text
    Page,
}

impl LoaderCategory {
    /// Selection order: the first enabled category wins
    pub const PRIORITY: [Self; 3] = [Self::Modal, Self::Auth, Self::Page];

    /// The category a descriptor selects, if any
    #[must_use]
    pub fn select(descriptor: &RequestDescriptor) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|category| category.enabled_in(descriptor))
    }

    const fn enabled_in(self, descriptor: &RequestDescriptor) -> bool {
        match self {
            Self::Modal => descriptor.modal_loader,
            Self::Auth => descriptor.auth_loader,
            Self::Page => descriptor.loader,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Modal => 0,
            Self::Auth => 1,
            Self::Page => 2,
        }
    }

    /// Patch raising this category's flag
    #[must_use]
    pub fn begin_patch(self, loader_text: &str) -> PagePatch {
        match self {
            Self::Modal => PagePatch::modal_loading(true),
            Self::Auth => PagePatch::auth_loading(true),
            Self::Page => PagePatch::page_loading(true).with_text(loader_text),
        }
    }

    /// Patch lowering this category's flag
    #[must_use]
    pub fn end_patch(self) -> PagePatch {
        match self {
            Self::Modal => PagePatch::modal_loading(false),
            Self::Auth => PagePatch::auth_loading(false),
            Self::Page => PagePatch::page_loading(false).with_text(""),
        }
    }
}

/// How concurrent requests of the same category share one flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoaderPolicy {
    /// Every request raises and lowers the flag; the first request to finish
    /// lowers it even while others are still in flight
    #[default]
    LastWriterWins,
    /// The flag is lowered only when the last in-flight request of the
    /// category finishes
    RefCounted,
}

impl FromStr for LoaderPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-writer-wins" => Ok(Self::LastWriterWins),
            "ref-counted" => Ok(Self::RefCounted),
            _ => Err(()),
        }
    }
}

/// Per-category in-flight bookkeeping for one coordinator
#[derive(Debug, Default)]
pub(crate) struct LoaderGate {
    policy: LoaderPolicy,
    in_flight: [AtomicUsize; 3],
}

impl LoaderGate {
    pub(crate) fn new(policy: LoaderPolicy) -> Self {
        Self {
            policy,
            in_flight: Default::default(),
        }
    }

    /// Record a request start; the begin patch is always dispatched
    ///
    /// The returned slot gives the count back when dropped, so a request whose
    /// future is dropped mid-flight still releases its category.
    pub(crate) fn enter(&self, category: LoaderCategory) -> InFlight<'_> {
        self.in_flight[category.index()].fetch_add(1, Ordering::SeqCst);
        InFlight {
            gate: self,
            category,
            released: false,
        }
    }

    fn release(&self, category: LoaderCategory) -> bool {
        let previous = self.in_flight[category.index()].fetch_sub(1, Ordering::SeqCst);
        match self.policy {
            LoaderPolicy::LastWriterWins => true,
            LoaderPolicy::RefCounted => previous == 1,
        }
    }
}

/// One request's hold on a loader category
#[derive(Debug)]
pub(crate) struct InFlight<'a> {
    gate: &'a LoaderGate,
    category: LoaderCategory,
    released: bool,
}

impl InFlight<'_> {
    /// Release the hold; returns whether to dispatch the end patch
    pub(crate) fn leave(mut self) -> bool {
        self.released = true;
        self.gate.release(self.category)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.gate.release(self.category);
        }
    }
}
