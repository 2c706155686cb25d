//! Raw source editing watcher.
//!
//! Engines stop reporting document changes while the user edits raw markup,
//! so during that window the tracker listens to low-level interaction events
//! on the source editing area and copies the markup into the form field
//! whenever it differs from what it saw last.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{ElementId, EventKind, Namespace, Page};
use crate::engine::{EngineEditor, RAW_VALUE_ATTRIBUTE, SOURCE_AREA_CLASS};
use crate::error::SourceModeError;

/// Events that may mean the raw markup changed.
pub const WATCHED_EVENTS: [EventKind; 8] = [
    EventKind::KeyPress,
    EventKind::KeyUp,
    EventKind::Change,
    EventKind::Focus,
    EventKind::Blur,
    EventKind::Click,
    EventKind::MouseDown,
    EventKind::MouseUp,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceModeState {
    Rendered,
    RawEditing,
}

/// Listeners attached for one stretch of raw source editing.
///
/// Dropping the session detaches every listener it attached.
#[derive(Debug)]
struct SyncSession {
    page: Page,
    surface: ElementId,
    namespace: Namespace,
    snapshot: Rc<RefCell<Option<String>>>,
}

impl SyncSession {
    fn open(page: &Page, surface: ElementId, source: ElementId) -> Result<Self, SourceModeError> {
        let session = Self {
            page: page.clone(),
            surface,
            namespace: page.next_namespace(),
            snapshot: Rc::new(RefCell::new(page.attribute(surface, RAW_VALUE_ATTRIBUTE))),
        };
        for kind in WATCHED_EVENTS {
            let snapshot = Rc::clone(&session.snapshot);
            page.listen(surface, kind, session.namespace, move |page, _| {
                flush_if_changed(page, surface, source, &snapshot);
            })?;
        }
        tracing::debug!(
            namespace = %session.namespace,
            %surface,
            listeners = WATCHED_EVENTS.len(),
            "source mode session opened"
        );
        Ok(session)
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        let detached = self.page.unlisten_namespace(self.surface, self.namespace);
        tracing::debug!(namespace = %self.namespace, detached, "source mode session closed");
    }
}

fn flush_if_changed(
    page: &Page,
    surface: ElementId,
    source: ElementId,
    snapshot: &RefCell<Option<String>>,
) {
    let current = page.attribute(surface, RAW_VALUE_ATTRIBUTE);
    if *snapshot.borrow() == current {
        return;
    }
    snapshot.replace(current.clone());

    let Some(markup) = current else {
        return;
    };
    match page.set_value(source, &markup) {
        Ok(()) => tracing::trace!(%source, "flushed raw markup to source element"),
        Err(err) => tracing::warn!(%err, "raw markup could not be saved"),
    }
}

/// Per-editor state machine switching between the rendered view and raw
/// source editing.
#[derive(Debug)]
pub struct SourceModeTracker {
    page: Page,
    ui_root: ElementId,
    source: ElementId,
    session: RefCell<Option<SyncSession>>,
}

impl SourceModeTracker {
    pub fn new(page: &Page, ui_root: ElementId, source: ElementId) -> Self {
        Self {
            page: page.clone(),
            ui_root,
            source,
            session: RefCell::new(None),
        }
    }

    /// Build a tracker for `editor` and subscribe it to the engine's source
    /// editing flag.
    pub fn arm<E: EngineEditor>(page: &Page, editor: &E) -> Rc<Self> {
        let tracker = Rc::new(Self::new(page, editor.ui_element(), editor.source_element()));
        let observer = Rc::clone(&tracker);
        editor.on_source_editing_mode_change(Box::new(move |_, enabled| {
            if let Err(err) = observer.set_raw_editing(enabled) {
                tracing::error!(%err, enabled, "source mode tracker could not follow the editor");
            }
        }));
        if editor.is_source_editing_mode()
            && let Err(err) = tracker.set_raw_editing(true)
        {
            tracing::error!(%err, "source mode tracker could not attach");
        }
        tracker
    }

    pub fn state(&self) -> SourceModeState {
        if self.session.borrow().is_some() {
            SourceModeState::RawEditing
        } else {
            SourceModeState::Rendered
        }
    }

    /// Namespace of the running session, if raw source editing is on.
    pub fn namespace(&self) -> Option<Namespace> {
        self.session.borrow().as_ref().map(|s| s.namespace)
    }

    /// Follow the engine's source editing flag.
    ///
    /// Switching on snapshots the raw markup and attaches the watchers under a
    /// fresh namespace; switching off detaches them. Repeating the current
    /// state does nothing.
    ///
    /// # Errors
    /// Returns [`SourceModeError::SurfaceMissing`] if the source editing area
    /// is not rendered, or [`SourceModeError::Dom`] if a listener cannot be
    /// attached. The tracker stays in [`SourceModeState::Rendered`] either way.
    pub fn set_raw_editing(&self, enabled: bool) -> Result<(), SourceModeError> {
        if !enabled {
            let session = self.session.borrow_mut().take();
            drop(session);
            return Ok(());
        }
        if self.session.borrow().is_some() {
            return Ok(());
        }

        let surface = self
            .page
            .find_by_class(self.ui_root, SOURCE_AREA_CLASS)
            .ok_or(SourceModeError::SurfaceMissing)?;
        let session = SyncSession::open(&self.page, surface, self.source)?;
        *self.session.borrow_mut() = Some(session);
        Ok(())
    }
}
