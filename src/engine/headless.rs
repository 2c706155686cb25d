//! A headless engine that keeps the document as an opaque markup string.
//!
//! It follows the engine contract closely enough to drive the assembler end
//! to end: it renders its chrome onto the page, suppresses change
//! notifications while raw source editing is on, and exposes the raw markup
//! through the source editing area's `data-value` attribute.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::{Engine, EngineEditor, RAW_VALUE_ATTRIBUTE, SOURCE_AREA_CLASS};
use crate::capability::{SOURCE_EDITING, find_plugin};
use crate::config::{EditorConfig, PLUGINS_KEY};
use crate::dom::{ElementId, EventKind, Page};
use crate::error::EngineError;

pub const EDITOR_CLASS: &str = "inkmount-editor";
pub const EDITABLE_CLASS: &str = "inkmount-editable";

/// Marks a form field that already hosts an editor.
const MOUNTED_ATTRIBUTE: &str = "data-inkmount";
/// Config key overriding the field's value as the starting document.
const INITIAL_DATA_KEY: &str = "initialData";

#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessEngine;

impl HeadlessEngine {
    pub const fn new() -> Self {
        Self
    }
}

impl Engine for HeadlessEngine {
    type Editor = HeadlessEditor;

    async fn create(
        &self,
        page: &Page,
        element: ElementId,
        config: &EditorConfig,
    ) -> Result<HeadlessEditor, EngineError> {
        let plugins = plugin_list(config)?;

        if !page.contains(element) {
            return Err(EngineError::new(format!("{element} is not on the page")));
        }
        if page.attribute(element, MOUNTED_ATTRIBUTE).is_some() {
            return Err(EngineError::new(format!(
                "{element} is already used by another editor"
            )));
        }

        let data = match config.get(INITIAL_DATA_KEY) {
            Some(Value::String(initial)) => initial.clone(),
            Some(_) => return Err(EngineError::new("initialData must be a string")),
            None => page.value(element).unwrap_or_default(),
        };

        let ui = render_chrome(page, element).map_err(|e| EngineError::new(e.to_string()))?;
        tracing::debug!(%element, %ui, plugins = plugins.len(), "headless editor ready");

        Ok(HeadlessEditor {
            page: page.clone(),
            state: Rc::new(RefCell::new(EditorState {
                ui,
                source: element,
                plugins,
                data,
                source_area: None,
                change_handlers: Vec::new(),
                mode_handlers: Vec::new(),
            })),
        })
    }
}

fn plugin_list(config: &EditorConfig) -> Result<Vec<String>, EngineError> {
    let Some(Value::Array(items)) = config.get(PLUGINS_KEY) else {
        return Err(EngineError::new("plugins must be a list of plugin names"));
    };
    items
        .iter()
        .map(|item| {
            let name = item
                .as_str()
                .ok_or_else(|| EngineError::new("plugins must be a list of plugin names"))?;
            if find_plugin(name).is_none() {
                return Err(EngineError::new(format!("plugin {name} is not available")));
            }
            Ok(name.to_string())
        })
        .collect()
}

fn render_chrome(page: &Page, element: ElementId) -> Result<ElementId, crate::error::DomError> {
    let ui = page.create_element("div");
    page.add_class(ui, EDITOR_CLASS)?;
    let editable = page.create_element("div");
    page.add_class(editable, EDITABLE_CLASS)?;
    page.append_child(ui, editable)?;
    if let Some(parent) = page.parent(element) {
        page.append_child(parent, ui)?;
    }
    page.set_attribute(element, MOUNTED_ATTRIBUTE, "true")?;
    Ok(ui)
}

type ChangeHandler = Rc<dyn Fn(&HeadlessEditor)>;
type ModeHandler = Rc<dyn Fn(&HeadlessEditor, bool)>;

struct EditorState {
    ui: ElementId,
    source: ElementId,
    plugins: Vec<String>,
    data: String,
    source_area: Option<ElementId>,
    change_handlers: Vec<ChangeHandler>,
    mode_handlers: Vec<ModeHandler>,
}

/// Editor handle produced by [`HeadlessEngine`].
#[derive(Clone)]
pub struct HeadlessEditor {
    page: Page,
    state: Rc<RefCell<EditorState>>,
}

impl std::fmt::Debug for HeadlessEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessEditor")
            .field("ui", &state.ui)
            .field("source", &state.source)
            .field("source_mode", &state.source_area.is_some())
            .finish_non_exhaustive()
    }
}

impl HeadlessEditor {
    /// Replace the document as if the user had edited the rendered view.
    ///
    /// Returns `false` and changes nothing while raw source editing is on,
    /// since the rendered view is read-only then.
    pub fn set_data(&self, data: &str) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.source_area.is_some() {
                return false;
            }
            data.clone_into(&mut state.data);
        }
        self.emit_change();
        true
    }

    /// The rendered source editing area, while raw source editing is on.
    pub fn source_area(&self) -> Option<ElementId> {
        self.state.borrow().source_area
    }

    /// Simulate the user typing `markup` into the source editing area.
    ///
    /// Returns `false` when raw source editing is off.
    pub fn type_source(&self, markup: &str) -> bool {
        let Some(area) = self.source_area() else {
            return false;
        };
        if self
            .page
            .set_attribute(area, RAW_VALUE_ATTRIBUTE, markup)
            .is_err()
        {
            return false;
        }
        self.page.dispatch(area, EventKind::KeyPress);
        self.page.dispatch(area, EventKind::KeyUp);
        true
    }

    fn emit_change(&self) {
        let handlers = self.state.borrow().change_handlers.clone();
        for handler in &handlers {
            handler(self);
        }
    }

    fn emit_mode(&self, enabled: bool) {
        let handlers = self.state.borrow().mode_handlers.clone();
        for handler in &handlers {
            handler(self, enabled);
        }
    }

    fn show_source(&self) {
        let (ui, data) = {
            let state = self.state.borrow();
            (state.ui, state.data.clone())
        };
        let area = self.page.create_element("div");
        let rendered = self
            .page
            .add_class(area, SOURCE_AREA_CLASS)
            .and_then(|()| self.page.set_attribute(area, RAW_VALUE_ATTRIBUTE, &data))
            .and_then(|()| self.page.append_child(ui, area));
        if let Err(err) = rendered {
            tracing::warn!(%err, "failed to render source editing area");
            return;
        }
        self.state.borrow_mut().source_area = Some(area);
        self.emit_mode(true);
    }

    fn hide_source(&self) {
        let Some(area) = self.state.borrow_mut().source_area.take() else {
            return;
        };
        self.emit_mode(false);

        let raw = self.page.attribute(area, RAW_VALUE_ATTRIBUTE);
        if let Err(err) = self.page.remove_element(area) {
            tracing::warn!(%err, "source editing area vanished before it was hidden");
        }
        let changed = raw.is_some_and(|raw| {
            let mut state = self.state.borrow_mut();
            if state.data == raw {
                false
            } else {
                state.data = raw;
                true
            }
        });
        if changed {
            self.emit_change();
        }
    }
}

impl EngineEditor for HeadlessEditor {
    fn ui_element(&self) -> ElementId {
        self.state.borrow().ui
    }

    fn source_element(&self) -> ElementId {
        self.state.borrow().source
    }

    fn has_plugin(&self, name: &str) -> bool {
        self.state.borrow().plugins.iter().any(|p| p == name)
    }

    fn data(&self) -> String {
        self.state.borrow().data.clone()
    }

    fn on_document_change(&self, handler: Box<dyn Fn(&Self)>) {
        self.state.borrow_mut().change_handlers.push(Rc::from(handler));
    }

    fn is_source_editing_mode(&self) -> bool {
        self.state.borrow().source_area.is_some()
    }

    fn set_source_editing_mode(&self, enabled: bool) {
        if !self.has_plugin(SOURCE_EDITING.name()) {
            tracing::warn!("source editing requested but the plugin is not loaded");
            return;
        }
        match (enabled, self.is_source_editing_mode()) {
            (true, false) => self.show_source(),
            (false, true) => self.hide_source(),
            _ => {}
        }
    }

    fn on_source_editing_mode_change(&self, handler: Box<dyn Fn(&Self, bool)>) {
        self.state.borrow_mut().mode_handlers.push(Rc::from(handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn mounted(page: &Page) -> ElementId {
        let form = page.create_element("form");
        let field = page.create_element("textarea");
        page.append_child(form, field).unwrap();
        page.set_value(field, "<p>hi</p>").unwrap();
        field
    }

    fn config(plugins: &[&str]) -> EditorConfig {
        EditorConfig::from_value(json!({ "plugins": plugins })).unwrap()
    }

    #[test]
    fn test_create_renders_chrome_next_to_the_field() {
        let page = Page::new();
        let field = mounted(&page);
        let editor =
            pollster::block_on(HeadlessEngine.create(&page, field, &config(&["Bold"]))).unwrap();

        let ui = editor.ui_element();
        assert!(page.has_class(ui, EDITOR_CLASS));
        assert_eq!(page.parent(ui), page.parent(field));
        assert!(page.find_by_class(ui, EDITABLE_CLASS).is_some());
        assert_eq!(editor.data(), "<p>hi</p>");
        assert!(editor.has_plugin("Bold"));
        assert!(!editor.has_plugin("Italic"));
    }

    #[test]
    fn test_create_rejects_unknown_plugins_and_reused_fields() {
        let page = Page::new();
        let field = mounted(&page);
        let err = pollster::block_on(HeadlessEngine.create(&page, field, &config(&["Nope"])))
            .unwrap_err();
        assert!(err.message().contains("Nope"));

        pollster::block_on(HeadlessEngine.create(&page, field, &config(&[]))).unwrap();
        let err =
            pollster::block_on(HeadlessEngine.create(&page, field, &config(&[]))).unwrap_err();
        assert!(err.message().contains("already used"));
    }

    #[test]
    fn test_create_requires_plugin_list() {
        let page = Page::new();
        let field = mounted(&page);
        let err = pollster::block_on(HeadlessEngine.create(&page, field, &EditorConfig::new()))
            .unwrap_err();
        assert!(err.message().contains("plugins"));
    }

    #[test]
    fn test_changes_are_silent_while_source_editing() {
        let page = Page::new();
        let field = mounted(&page);
        let editor = pollster::block_on(HeadlessEngine.create(
            &page,
            field,
            &config(&["SourceEditing"]),
        ))
        .unwrap();
        let changes = Rc::new(Cell::new(0));
        let seen = Rc::clone(&changes);
        editor.on_document_change(Box::new(move |_| seen.set(seen.get() + 1)));

        assert!(editor.set_data("<p>one</p>"));
        editor.set_source_editing_mode(true);
        assert!(editor.is_source_editing_mode());
        assert!(!editor.set_data("<p>ignored</p>"));
        assert!(editor.type_source("<p>two</p>"));
        assert_eq!(changes.get(), 1);

        editor.set_source_editing_mode(false);
        assert_eq!(changes.get(), 2);
        assert_eq!(editor.data(), "<p>two</p>");
        assert!(editor.source_area().is_none());
    }

    #[test]
    fn test_leaving_source_mode_without_edits_is_silent() {
        let page = Page::new();
        let field = mounted(&page);
        let editor = pollster::block_on(HeadlessEngine.create(
            &page,
            field,
            &config(&["SourceEditing"]),
        ))
        .unwrap();
        let changes = Rc::new(Cell::new(0));
        let seen = Rc::clone(&changes);
        editor.on_document_change(Box::new(move |_| seen.set(seen.get() + 1)));

        editor.set_source_editing_mode(true);
        editor.set_source_editing_mode(false);
        assert_eq!(changes.get(), 0);
    }

    #[test]
    fn test_source_mode_needs_the_plugin() {
        let page = Page::new();
        let field = mounted(&page);
        let editor =
            pollster::block_on(HeadlessEngine.create(&page, field, &config(&["Bold"]))).unwrap();
        editor.set_source_editing_mode(true);
        assert!(!editor.is_source_editing_mode());
        assert!(!editor.type_source("<p>x</p>"));
    }
}
