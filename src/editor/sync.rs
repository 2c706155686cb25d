use std::cell::Cell;
use std::rc::Rc;

use crate::dom::Page;
use crate::engine::EngineEditor;

/// Copies the serialized document into the form field after every change
/// the engine reports. Nothing is batched or debounced.
#[derive(Debug, Clone)]
pub struct SourceSync {
    writes: Rc<Cell<usize>>,
}

impl SourceSync {
    pub fn attach<E: EngineEditor>(page: &Page, editor: &E) -> Self {
        let writes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&writes);
        let page = page.clone();
        editor.on_document_change(Box::new(move |editor| {
            let source = editor.source_element();
            match page.set_value(source, &editor.data()) {
                Ok(()) => {
                    counter.set(counter.get() + 1);
                    tracing::trace!(%source, "flushed document to source element");
                }
                Err(err) => tracing::warn!(%err, "document change could not be saved"),
            }
        }));
        Self { writes }
    }

    /// Number of flushes performed so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::engine::{Engine, HeadlessEngine};
    use serde_json::json;

    #[test]
    fn test_every_change_is_flushed() {
        let page = Page::new();
        let field = page.create_element("textarea");
        let config = EditorConfig::from_value(json!({ "plugins": [] })).unwrap();
        let editor = pollster::block_on(HeadlessEngine.create(&page, field, &config)).unwrap();
        let sync = SourceSync::attach(&page, &editor);

        editor.set_data("<p>one</p>");
        editor.set_data("<p>one</p>");
        editor.set_data("<p>two</p>");

        assert_eq!(sync.writes(), 3);
        assert_eq!(page.value_writes(field), 3);
        assert_eq!(page.value(field).as_deref(), Some("<p>two</p>"));
    }

    #[test]
    fn test_missing_field_is_not_counted() {
        let page = Page::new();
        let field = page.create_element("textarea");
        let config = EditorConfig::from_value(json!({ "plugins": [] })).unwrap();
        let editor = pollster::block_on(HeadlessEngine.create(&page, field, &config)).unwrap();
        let sync = SourceSync::attach(&page, &editor);

        page.remove_element(field).unwrap();
        editor.set_data("<p>lost</p>");
        assert_eq!(sync.writes(), 0);
    }

    #[test]
    fn test_removed_field_writes_never_reach_a_new_element() {
        let page = Page::new();
        let field = page.create_element("textarea");
        let config = EditorConfig::from_value(json!({ "plugins": [] })).unwrap();
        let editor = pollster::block_on(HeadlessEngine.create(&page, field, &config)).unwrap();
        let sync = SourceSync::attach(&page, &editor);

        page.remove_element(field).unwrap();
        let stranger = page.create_element("textarea");
        editor.set_data("<p>lost</p>");

        assert_eq!(sync.writes(), 0);
        assert_eq!(page.value_writes(stranger), 0);
        assert_eq!(page.value(stranger).as_deref(), Some(""));
    }
}
