use super::registry::{Plugin, SOURCE_EDITING};

/// One row of the button dependency table.
///
/// The row's plugins are needed when at least one of its buttons is on
/// the toolbar. A plugin may appear in several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDependency {
    pub plugins: &'static [Plugin],
    pub buttons: &'static [&'static str],
}

impl ButtonDependency {
    pub const fn new(plugins: &'static [Plugin], buttons: &'static [&'static str]) -> Self {
        Self { plugins, buttons }
    }

    /// Whether any of this row's buttons is in `requested`.
    pub fn is_requested<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        requested
            .iter()
            .any(|button| self.buttons.contains(&button.as_ref()))
    }

    pub fn owns(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }
}

const fn p(name: &'static str) -> Plugin {
    Plugin::new(name)
}

/// Which plugins each toolbar button pulls in.
///
/// Plugins missing from every row (Autoformat, Essentials, ...) are always
/// loaded.
pub const BUTTON_DEPENDENCIES: &[ButtonDependency] = &[
    ButtonDependency::new(&[p("Alignment")], &["alignment"]),
    ButtonDependency::new(
        &[
            p("AutoImage"),
            p("ImageInsertUI"),
            p("Image"),
            p("ImageCaption"),
            p("ImageStyle"),
            p("ImageToolbar"),
            p("LinkImage"),
        ],
        &["insertImage"],
    ),
    ButtonDependency::new(
        &[p("AutoLink"), p("LinkUI"), p("LinkEditing"), p("LinkImage")],
        &["link"],
    ),
    ButtonDependency::new(&[p("BlockQuote")], &["blockQuote"]),
    ButtonDependency::new(&[p("Bold")], &["bold"]),
    ButtonDependency::new(&[p("Code")], &["code"]),
    ButtonDependency::new(&[p("CodeBlock")], &["codeBlock"]),
    ButtonDependency::new(
        &[p("Font")],
        &["fontSize", "fontFamily", "fontColor", "fontBackgroundColor"],
    ),
    ButtonDependency::new(&[p("FindAndReplace")], &["findAndReplace"]),
    ButtonDependency::new(&[p("Heading")], &["heading"]),
    ButtonDependency::new(&[p("HorizontalLine")], &["horizontalLine"]),
    ButtonDependency::new(&[p("HtmlEmbed")], &["htmlEmbed"]),
    ButtonDependency::new(&[p("Indent")], &["outdent", "indent"]),
    ButtonDependency::new(&[p("Italic")], &["italic"]),
    ButtonDependency::new(
        &[p("List"), p("ListProperties")],
        &["bulletedList", "numberedList"],
    ),
    ButtonDependency::new(&[p("MediaEmbed"), p("MediaEmbedToolbar")], &["mediaEmbed"]),
    ButtonDependency::new(&[p("PageBreak")], &["pageBreak"]),
    ButtonDependency::new(&[SOURCE_EDITING], &["sourceEditing"]),
    ButtonDependency::new(&[p("Strikethrough")], &["strikethrough"]),
    ButtonDependency::new(&[p("Style")], &["style"]),
    ButtonDependency::new(&[p("Subscript")], &["subscript"]),
    ButtonDependency::new(&[p("Superscript")], &["superscript"]),
    ButtonDependency::new(
        &[p("Table"), p("TableCaption"), p("TableToolbar"), p("TableUI")],
        &["insertTable"],
    ),
    ButtonDependency::new(&[p("TodoList")], &["todoList"]),
    ButtonDependency::new(&[p("Underline")], &["underline"]),
];
