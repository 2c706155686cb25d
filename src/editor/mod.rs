//! Editor assembly.
//!
//! Turns a mount target and an [`EditorConfig`] into a running editor:
//! resolves the toolbar into a plugin list, hands the merged config to the
//! engine, then wires up the two paths that keep the form field in sync.
//! [`SourceSync`] covers the rendered view; [`SourceModeTracker`] covers raw
//! source editing, when the engine goes quiet.

mod source_mode;
mod sync;

use std::rc::Rc;

pub use source_mode::{SourceModeState, SourceModeTracker, WATCHED_EVENTS};
pub use sync::SourceSync;

use crate::capability::{Plugin, SOURCE_EDITING};
use crate::config::EditorConfig;
use crate::dom::{ElementId, Namespace, Page};
use crate::engine::{Engine, EngineEditor};
use crate::error::{AssembleError, SourceModeError};
use crate::toolbar::{RemovalPolicy, Resolver};

/// Where to put an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mount {
    Element(ElementId),
    /// Document id of the element, with or without a leading `#`.
    Id(String),
}

impl Mount {
    fn locate(&self, page: &Page) -> Result<ElementId, AssembleError> {
        match self {
            Self::Element(el) if page.contains(*el) => Ok(*el),
            Self::Element(el) => Err(AssembleError::MountNotFound(el.to_string())),
            Self::Id(id) => {
                let id = id.strip_prefix('#').unwrap_or(id);
                page.element_by_id(id)
                    .ok_or_else(|| AssembleError::MountNotFound(format!("#{id}")))
            }
        }
    }
}

impl From<ElementId> for Mount {
    fn from(el: ElementId) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Mount {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Mount {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Builds editors on one page with one engine.
#[derive(Debug)]
pub struct Assembler<E> {
    page: Page,
    engine: E,
    resolver: Resolver<'static>,
}

impl<E: Engine> Assembler<E> {
    pub fn new(page: &Page, engine: E) -> Self {
        Self {
            page: page.clone(),
            engine,
            resolver: Resolver::builtin(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RemovalPolicy) -> Self {
        self.resolver = self.resolver.with_policy(policy);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver<'static>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build an editor on `mount`.
    ///
    /// Nothing is attached to the page unless the engine succeeds.
    ///
    /// # Errors
    /// - [`AssembleError::Config`] if `toolbar` is malformed.
    /// - [`AssembleError::MountNotFound`] if the mount cannot be located.
    /// - [`AssembleError::EngineInitialization`] if the engine rejects the
    ///   merged config.
    #[allow(clippy::future_not_send)]
    pub async fn assemble(
        &self,
        mount: impl Into<Mount>,
        config: &EditorConfig,
    ) -> Result<EditorInstance<E::Editor>, AssembleError> {
        let mount = mount.into();
        let toolbar = config.toolbar()?;
        let plugins = self.resolver.resolve(toolbar.as_deref());
        let merged = config.with_plugins(&plugins);

        let element = mount.locate(&self.page).inspect_err(|err| {
            tracing::warn!(%err, "editor mount not found");
        })?;

        let editor = self
            .engine
            .create(&self.page, element, &merged)
            .await
            .map_err(|err| {
                tracing::warn!(%err, %element, "editor engine rejected the config");
                AssembleError::EngineInitialization(err)
            })?;

        let sync = SourceSync::attach(&self.page, &editor);
        let tracker = plugins
            .contains(&SOURCE_EDITING)
            .then(|| SourceModeTracker::arm(&self.page, &editor));

        tracing::info!(
            %element,
            plugins = plugins.len(),
            source_mode = tracker.is_some(),
            "editor assembled"
        );

        Ok(EditorInstance {
            editor,
            plugins,
            config: merged,
            sync,
            tracker,
        })
    }
}

/// Assemble an editor with the default removal policy.
///
/// # Errors
/// See [`Assembler::assemble`].
#[allow(clippy::future_not_send)]
pub async fn create<E: Engine>(
    page: &Page,
    engine: E,
    mount: impl Into<Mount>,
    config: &EditorConfig,
) -> Result<EditorInstance<E::Editor>, AssembleError> {
    Assembler::new(page, engine).assemble(mount, config).await
}

/// A running editor and the machinery keeping its form field current.
#[derive(Debug)]
pub struct EditorInstance<Ed> {
    editor: Ed,
    plugins: Vec<Plugin>,
    config: EditorConfig,
    sync: SourceSync,
    tracker: Option<Rc<SourceModeTracker>>,
}

impl<Ed: EngineEditor> EditorInstance<Ed> {
    /// Root element of the rendered editor.
    pub fn ui_element(&self) -> ElementId {
        self.editor.ui_element()
    }

    /// The form field backing this editor.
    pub fn source_element(&self) -> ElementId {
        self.editor.source_element()
    }

    /// A loaded plugin by name.
    pub fn plugin(&self, name: &str) -> Option<Plugin> {
        self.plugins.iter().copied().find(|p| p.name() == name)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// The config the engine was built with.
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub const fn editor(&self) -> &Ed {
        &self.editor
    }

    /// Flushes performed by the rendered-view sync path.
    pub fn sync_writes(&self) -> usize {
        self.sync.writes()
    }

    /// `None` when source editing is not loaded.
    pub fn source_mode(&self) -> Option<SourceModeState> {
        self.tracker.as_ref().map(|t| t.state())
    }

    pub fn source_mode_namespace(&self) -> Option<Namespace> {
        self.tracker.as_ref().and_then(|t| t.namespace())
    }

    /// Switch raw source editing on or off.
    ///
    /// # Errors
    /// Returns [`SourceModeError::Unavailable`] if source editing is not
    /// loaded, or the tracker's error if it could not follow the engine.
    pub fn set_source_mode(&self, enabled: bool) -> Result<(), SourceModeError> {
        let Some(tracker) = &self.tracker else {
            return Err(SourceModeError::Unavailable);
        };
        self.editor.set_source_editing_mode(enabled);
        // The engine has already notified the tracker; this surfaces any
        // failure that notification swallowed.
        tracker.set_raw_editing(self.editor.is_source_editing_mode())
    }
}
