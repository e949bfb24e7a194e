#![forbid(unsafe_code)]

//! Presentation and registry event payloads.
//!
//! Events carry identity, never draft content.

use crate::handle::{DraftHandle, DraftId};
use std::fmt;
use std::rc::Rc;

/// Lifecycle events emitted by presentation controllers.
///
/// The registry subscribes to these; in normal operation they are its sole
/// mutation path.
#[derive(Clone)]
pub enum PresentationEvent {
    /// A draft finished presenting (animation completed, not cancelled).
    DidPresent(Rc<dyn DraftHandle>),
    /// A draft is about to close for good, not minimize.
    WillDismissNonInteractive(Rc<dyn DraftHandle>),
}

impl PresentationEvent {
    #[must_use]
    pub fn draft_id(&self) -> DraftId {
        match self {
            Self::DidPresent(h) | Self::WillDismissNonInteractive(h) => h.id(),
        }
    }
}

impl fmt::Debug for PresentationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DidPresent(_) => "DidPresent",
            Self::WillDismissNonInteractive(_) => "WillDismissNonInteractive",
        };
        write!(f, "{name}({})", self.draft_id())
    }
}

/// Snapshot of the registry after a mutation, delivered to change
/// observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryChange {
    /// Open draft identities, oldest first.
    pub ids: Vec<DraftId>,
    /// Title of the most recently opened draft, if any.
    pub most_recent_title: Option<String>,
}

impl RegistryChange {
    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}
