#![forbid(unsafe_code)]

//! Draft identity and the host-screen contract.
//!
//! A draft screen is owned by the host; this library only needs its
//! identity, its title, and where an interactive dismissal gesture may
//! attach. Screens that do not carry a draft handle can still be
//! presented, they just never minimize into the indicator stack.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Stable identity of a draft, unique within the host process and usable
/// as a restoration key across launches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(String);

impl DraftId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque token for a host view that a pan gesture may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceRef(pub u64);

/// The contract a draft screen exposes to the presentation system.
///
/// Identity is `DraftId` equality; the registry never compares handles by
/// pointer.
pub trait DraftHandle {
    fn id(&self) -> DraftId;
    /// Display title; `None` renders as an untitled draft.
    fn title(&self) -> Option<String>;
    /// The view interactive dismissal should grab, if the screen offers one.
    fn draggable_surface(&self) -> Option<SurfaceRef>;
}

impl fmt::Debug for dyn DraftHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftHandle")
            .field("id", &self.id())
            .field("title", &self.title())
            .finish_non_exhaustive()
    }
}

/// Packed RGBA color, 0xRRGGBBAA. The library never interprets channels;
/// it only hands colors back to the host for the simulated view.
pub type PackedColor = u32;

/// Visual chrome of the presenting screen, captured once at the
/// presentation boundary so the simulated background view can imitate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenChrome {
    /// A plain screen; the simulated view is a solid fill.
    Plain { background: PackedColor },
    /// A navigation container; the simulated view grows a matching bar and
    /// the dismissal gesture attaches to the bar.
    NavigationBar {
        background: PackedColor,
        bar_background: PackedColor,
        bar_hidden: bool,
    },
}

impl Default for ScreenChrome {
    fn default() -> Self {
        Self::Plain { background: 0 }
    }
}

/// A host screen handed to the presentation controller.
///
/// The draft capability is resolved here, once, instead of re-checked at
/// every call site.
#[derive(Clone, Default)]
pub struct HostScreen {
    /// Present when the screen is a draft; absent screens present normally
    /// but never minimize.
    pub handle: Option<Rc<dyn DraftHandle>>,
    pub chrome: ScreenChrome,
}

impl HostScreen {
    #[must_use]
    pub fn with_draft(handle: Rc<dyn DraftHandle>, chrome: ScreenChrome) -> Self {
        Self {
            handle: Some(handle),
            chrome,
        }
    }

    #[must_use]
    pub fn plain(chrome: ScreenChrome) -> Self {
        Self {
            handle: None,
            chrome,
        }
    }

    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.handle.is_some()
    }

    /// Where the interactive dismissal gesture attaches: the draft's
    /// draggable surface, or the bar of a navigation container.
    #[must_use]
    pub fn gesture_attachment(&self) -> Option<GestureAttachment> {
        if let Some(handle) = &self.handle {
            return handle.draggable_surface().map(GestureAttachment::Surface);
        }
        match self.chrome {
            ScreenChrome::NavigationBar { bar_hidden: false, .. } => {
                Some(GestureAttachment::NavigationBar)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for HostScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostScreen")
            .field("draft", &self.handle.as_ref().map(|h| h.id()))
            .field("chrome", &self.chrome)
            .finish()
    }
}

/// Resolved gesture attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAttachment {
    Surface(SurfaceRef),
    NavigationBar,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) struct TestDraft {
        pub id: DraftId,
        pub title: Option<String>,
        pub surface: Option<SurfaceRef>,
    }

    impl DraftHandle for TestDraft {
        fn id(&self) -> DraftId {
            self.id.clone()
        }
        fn title(&self) -> Option<String> {
            self.title.clone()
        }
        fn draggable_surface(&self) -> Option<SurfaceRef> {
            self.surface
        }
    }

    fn draft(surface: Option<SurfaceRef>) -> Rc<dyn DraftHandle> {
        Rc::new(TestDraft {
            id: DraftId::new("d1"),
            title: Some("Reply".into()),
            surface,
        })
    }

    #[test]
    fn draft_surface_wins_attachment() {
        let screen = HostScreen::with_draft(
            draft(Some(SurfaceRef(9))),
            ScreenChrome::NavigationBar {
                background: 0,
                bar_background: 0,
                bar_hidden: false,
            },
        );
        assert_eq!(
            screen.gesture_attachment(),
            Some(GestureAttachment::Surface(SurfaceRef(9)))
        );
    }

    #[test]
    fn draft_without_surface_has_no_attachment() {
        let screen = HostScreen::with_draft(draft(None), ScreenChrome::default());
        assert_eq!(screen.gesture_attachment(), None);
    }

    #[test]
    fn navigation_bar_attachment_for_plain_containers() {
        let screen = HostScreen::plain(ScreenChrome::NavigationBar {
            background: 0xffffffff,
            bar_background: 0xeeeeeeff,
            bar_hidden: false,
        });
        assert_eq!(
            screen.gesture_attachment(),
            Some(GestureAttachment::NavigationBar)
        );

        let hidden = HostScreen::plain(ScreenChrome::NavigationBar {
            background: 0,
            bar_background: 0,
            bar_hidden: true,
        });
        assert_eq!(hidden.gesture_attachment(), None);
    }

    #[test]
    fn draft_id_serde_and_display() {
        let id = DraftId::new("uuid-123");
        assert_eq!(id.to_string(), "uuid-123");
        let json = serde_json::to_string(&id).unwrap();
        let back: DraftId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
