#![forbid(unsafe_code)]

//! The open-drafts registry.
//!
//! One long-lived, explicitly constructed instance tracks every draft that
//! is currently presented or minimized, ordered oldest to newest. Cloning
//! a registry clones a handle to the same list.
//!
//! # Invariants
//!
//! 1. Identities are unique: re-adding an open draft moves it to the end
//!    instead of duplicating it.
//! 2. Mutate-then-notify: observers always see the post-mutation list.
//! 3. Restoration repopulates silently and emits exactly one change from
//!    [`finish_restoration`](OpenDraftsRegistry::finish_restoration).

use crate::events::{PresentationEvent, RegistryChange};
use crate::handle::{DraftHandle, DraftId};
use draftstack_core::observer::{ObserverList, Subscription};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// What to do when the user taps the minimized-drafts indicator.
#[derive(Clone)]
pub enum PresentDraftAction {
    /// Nothing is open; do nothing.
    NoDrafts,
    /// One draft is open; re-present it directly. The host should call
    /// [`DraftPresentationController::mark_previously_presented`] on the new
    /// controller so the presentation starts from the peeking position.
    ///
    /// [`DraftPresentationController::mark_previously_presented`]:
    ///     crate::controller::DraftPresentationController::mark_previously_presented
    Single(Rc<dyn DraftHandle>),
    /// Several drafts are open; show the stacked-card picker.
    Picker(Vec<DraftId>),
}

impl fmt::Debug for PresentDraftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDrafts => f.write_str("NoDrafts"),
            Self::Single(h) => write!(f, "Single({})", h.id()),
            Self::Picker(ids) => f.debug_tuple("Picker").field(ids).finish(),
        }
    }
}

/// Serialized registry state: an ordered identity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub ids: Vec<DraftId>,
}

struct Inner {
    drafts: Vec<Rc<dyn DraftHandle>>,
    restoring: bool,
}

/// Ordered, identity-unique list of open drafts.
pub struct OpenDraftsRegistry {
    inner: Rc<RefCell<Inner>>,
    changes: ObserverList<RegistryChange>,
}

impl Default for OpenDraftsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Clone: shares the same list and observers.
impl Clone for OpenDraftsRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            changes: self.changes.clone(),
        }
    }
}

impl fmt::Debug for OpenDraftsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenDraftsRegistry")
            .field("ids", &self.ids())
            .finish_non_exhaustive()
    }
}

impl OpenDraftsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                drafts: Vec::new(),
                restoring: false,
            })),
            changes: ObserverList::new(),
        }
    }

    /// Observer list for registry changes. Subscribe here to re-render an
    /// indicator or picker.
    #[must_use]
    pub fn changes(&self) -> &ObserverList<RegistryChange> {
        &self.changes
    }

    /// Wire this registry to a presentation event bus: a completed
    /// presentation adds the draft, a non-interactive dismissal removes it.
    ///
    /// The returned guard must be kept alive for the wiring to hold.
    #[must_use]
    pub fn observe_presentation(&self, events: &ObserverList<PresentationEvent>) -> Subscription {
        let registry = self.clone();
        events.subscribe(move |event| match event {
            PresentationEvent::DidPresent(handle) => registry.add(Rc::clone(handle)),
            PresentationEvent::WillDismissNonInteractive(handle) => {
                registry.remove(&handle.id());
            }
        })
    }

    /// Add a draft, or move it to the end if its identity is already open.
    /// Always notifies.
    pub fn add(&self, handle: Rc<dyn DraftHandle>) {
        let id = handle.id();
        {
            let mut inner = self.inner.borrow_mut();
            inner.drafts.retain(|d| d.id() != id);
            inner.drafts.push(handle);
        }
        debug!(draft = %id, count = self.count(), "draft added");
        self.notify();
    }

    /// Remove a draft by identity. Notifies whether or not it was present.
    pub fn remove(&self, id: &DraftId) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.drafts.retain(|d| d.id() != *id);
        }
        debug!(draft = %id, count = self.count(), "draft removed");
        self.notify();
    }

    /// Cloned snapshot of the open drafts, oldest first. Render code must
    /// iterate this, never the live list.
    #[must_use]
    pub fn open_drafts(&self) -> Vec<Rc<dyn DraftHandle>> {
        self.inner.borrow().drafts.clone()
    }

    /// Identities of the open drafts, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<DraftId> {
        self.inner.borrow().drafts.iter().map(|d| d.id()).collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.borrow().drafts.len()
    }

    /// Title of the most recently opened draft.
    #[must_use]
    pub fn most_recent_title(&self) -> Option<String> {
        self.inner.borrow().drafts.last().and_then(|d| d.title())
    }

    /// Decide how an indicator tap should reopen drafts. The host executes
    /// the returned action.
    #[must_use]
    pub fn present_action(&self) -> PresentDraftAction {
        let inner = self.inner.borrow();
        match inner.drafts.len() {
            0 => PresentDraftAction::NoDrafts,
            1 => PresentDraftAction::Single(Rc::clone(&inner.drafts[0])),
            _ => PresentDraftAction::Picker(inner.drafts.iter().map(|d| d.id()).collect()),
        }
    }

    /// Ordered identity list for state preservation.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot { ids: self.ids() }
    }

    /// Repopulate from a snapshot without notifying. Identities the
    /// resolver cannot produce a handle for are skipped; a missing draft
    /// is an expected empty state, not an error.
    pub fn restore(
        &self,
        snapshot: &RegistrySnapshot,
        resolver: impl Fn(&DraftId) -> Option<Rc<dyn DraftHandle>>,
    ) {
        let mut inner = self.inner.borrow_mut();
        inner.restoring = true;
        inner.drafts = snapshot.ids.iter().filter_map(|id| resolver(id)).collect();
        debug!(
            requested = snapshot.ids.len(),
            restored = inner.drafts.len(),
            "registry restored"
        );
    }

    /// End restoration and emit the single deferred change notification.
    pub fn finish_restoration(&self) {
        self.inner.borrow_mut().restoring = false;
        self.notify();
    }

    fn notify(&self) {
        let change = {
            let inner = self.inner.borrow();
            if inner.restoring {
                return;
            }
            RegistryChange {
                ids: inner.drafts.iter().map(|d| d.id()).collect(),
                most_recent_title: inner.drafts.last().and_then(|d| d.title()),
            }
        };
        self.changes.emit(&change);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
