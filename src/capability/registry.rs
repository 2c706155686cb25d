use std::fmt;

use serde::Serialize;

/// A named, independently loadable unit of editing functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Plugin(&'static str);

impl Plugin {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The identifier the engine knows this plugin by.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<str> for Plugin {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Raw markup editing. Its presence decides whether an editor gets a
/// source-mode tracker.
pub const SOURCE_EDITING: Plugin = Plugin::new("SourceEditing");

/// Every plugin the editor can load, in load order.
pub const ALL_PLUGINS: &[Plugin] = &[
    Plugin::new("Alignment"),
    Plugin::new("AutoImage"),
    Plugin::new("AutoLink"),
    Plugin::new("Autoformat"),
    Plugin::new("BlockQuote"),
    Plugin::new("Bold"),
    Plugin::new("Code"),
    Plugin::new("CodeBlock"),
    Plugin::new("Essentials"),
    Plugin::new("FindAndReplace"),
    Plugin::new("Font"),
    Plugin::new("GeneralHtmlSupport"),
    Plugin::new("Heading"),
    Plugin::new("HorizontalLine"),
    Plugin::new("HtmlComment"),
    Plugin::new("HtmlEmbed"),
    Plugin::new("Image"),
    Plugin::new("ImageCaption"),
    Plugin::new("ImageStyle"),
    Plugin::new("ImageToolbar"),
    Plugin::new("Indent"),
    Plugin::new("Italic"),
    Plugin::new("LinkEditing"),
    Plugin::new("LinkImage"),
    Plugin::new("List"),
    Plugin::new("ListProperties"),
    Plugin::new("MediaEmbed"),
    Plugin::new("MediaEmbedToolbar"),
    Plugin::new("PageBreak"),
    Plugin::new("PasteFromOffice"),
    SOURCE_EDITING,
    Plugin::new("Strikethrough"),
    Plugin::new("Style"),
    Plugin::new("Subscript"),
    Plugin::new("Superscript"),
    Plugin::new("Table"),
    Plugin::new("TableCaption"),
    Plugin::new("TableToolbar"),
    Plugin::new("TableUI"),
    Plugin::new("TodoList"),
    Plugin::new("Underline"),
    Plugin::new("WordCount"),
    Plugin::new("ImageInsertUI"),
    Plugin::new("LinkUI"),
];

/// Names of every registered plugin, in registry order.
pub fn plugin_names() -> Vec<&'static str> {
    ALL_PLUGINS.iter().map(|p| p.name()).collect()
}

/// Look up a registered plugin by name.
pub fn find_plugin(name: &str) -> Option<Plugin> {
    ALL_PLUGINS.iter().copied().find(|p| p.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_no_duplicates() {
        let unique: HashSet<_> = ALL_PLUGINS.iter().collect();
        assert_eq!(unique.len(), ALL_PLUGINS.len());
    }

    #[test]
    fn test_plugin_names_follow_registry_order() {
        let names = plugin_names();
        assert_eq!(names.len(), 44);
        assert_eq!(names.first(), Some(&"Alignment"));
        assert_eq!(names.last(), Some(&"LinkUI"));
    }

    #[test]
    fn test_find_plugin_by_name() {
        assert_eq!(find_plugin("SourceEditing"), Some(SOURCE_EDITING));
        assert_eq!(find_plugin("sourceEditing"), None);
    }

    #[test]
    fn test_plugin_serializes_as_bare_name() {
        let json = serde_json::to_string(&SOURCE_EDITING).unwrap();
        assert_eq!(json, "\"SourceEditing\"");
    }
}
