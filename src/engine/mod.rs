//! The seam to the rich-text editing engine.
//!
//! The engine owns the document model, rendering and undo history. This crate
//! only needs to construct it, hear about document changes, read the
//! serialized document, and flip raw source editing on and off.

mod headless;

use std::future::Future;

pub use headless::{EDITOR_CLASS, EDITABLE_CLASS, HeadlessEditor, HeadlessEngine};

use crate::config::EditorConfig;
use crate::dom::{ElementId, Page};
use crate::error::EngineError;

/// Class of the element the engine renders while raw source editing is on.
pub const SOURCE_AREA_CLASS: &str = "source-editing-area";
/// Attribute of the source editing area holding the current raw markup.
pub const RAW_VALUE_ATTRIBUTE: &str = "data-value";

/// Builds editors.
pub trait Engine {
    type Editor: EngineEditor;

    /// Build an editor on `element` with the merged `config`.
    ///
    /// The returned future resolves once the editor is ready or the engine
    /// has rejected the configuration.
    fn create(
        &self,
        page: &Page,
        element: ElementId,
        config: &EditorConfig,
    ) -> impl Future<Output = Result<Self::Editor, EngineError>>;
}

/// A live editor produced by an [`Engine`].
///
/// Implementations are cheap handles; handlers receive the editor they were
/// registered on so they never need to hold a clone of it.
pub trait EngineEditor: Sized + 'static {
    /// Root element of the rendered editor.
    fn ui_element(&self) -> ElementId;

    /// The form field the editor was mounted on.
    fn source_element(&self) -> ElementId;

    fn has_plugin(&self, name: &str) -> bool;

    /// Serialize the current document.
    fn data(&self) -> String;

    /// Called after every document mutation. Engines do not report
    /// mutations while raw source editing is on.
    fn on_document_change(&self, handler: Box<dyn Fn(&Self)>);

    fn is_source_editing_mode(&self) -> bool;

    fn set_source_editing_mode(&self, enabled: bool);

    /// Called whenever the source editing flag flips.
    fn on_source_editing_mode_change(&self, handler: Box<dyn Fn(&Self, bool)>);
}
