//! Error types shared across the crate.

use thiserror::Error;

use crate::dom::ElementId;

/// Failure to build an editor instance.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("mount element {0} was not found on the page")]
    MountNotFound(String),
    #[error("editor engine failed to initialize")]
    EngineInitialization(#[source] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Rejection reported by the editing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A malformed editor configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("editor config must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("`toolbar` must be a list of button names or an object with `items`")]
    InvalidToolbar,
    #[error("toolbar entry at index {0} is not a string")]
    InvalidToolbarItem(usize),
}

/// A malformed registry or dependency table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("plugin {0} is registered more than once")]
    DuplicatePlugin(&'static str),
    #[error("dependency row {row} names unregistered plugin {plugin}")]
    UnknownPlugin { row: usize, plugin: &'static str },
    #[error("dependency row {0} has no buttons")]
    NoButtons(usize),
    #[error("dependency row {0} has no plugins")]
    NoPlugins(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("element {0} is not attached to the page")]
    MissingElement(ElementId),
}

/// Failure to switch an editor in or out of raw source editing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceModeError {
    #[error("source editing is not loaded for this editor")]
    Unavailable,
    #[error("the source editing area was not rendered")]
    SurfaceMissing,
    #[error(transparent)]
    Dom(#[from] DomError),
}
