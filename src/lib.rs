// The dependency tree carries two versions of a few platform crates
// (windows-sys and friends); nothing in this package can line them up.
#![allow(clippy::multiple_crate_versions)]

//! # Inkmount
//!
//! Assemble rich-text editors from a toolbar layout and keep their form
//! fields in sync.
//!
//! Inkmount sits between a page and a rich-text editing engine:
//! - Works out which plugins a toolbar needs, loading nothing else
//! - Hands the engine a merged config and waits for it to come up
//! - Mirrors every document change into the backing form field
//! - Keeps mirroring while the user edits raw markup, when the engine is silent
//!
//! ## Architecture
//!
//! Everything runs on one event loop. The only suspension point is the
//! engine's construction inside [`editor::Assembler::assemble`]. Two paths
//! write to the form field and never overlap:
//! - **Rendered view**: [`editor::SourceSync`] listens to engine changes
//! - **Raw source editing**: [`editor::SourceModeTracker`] listens to page
//!   events under its own namespace
//!
//! ## Modules
//!
//! - [`capability`]: Plugin registry and button dependency table
//! - [`toolbar`]: Toolbar to plugin resolution
//! - [`config`]: Editor config record and config files
//! - [`dom`]: Page elements, form values and namespaced listeners
//! - [`engine`]: Editing engine seam and a headless engine
//! - [`editor`]: Assembly and synchronization
//! - [`error`]: Error types

pub mod capability;
pub mod config;
pub mod dom;
pub mod editor;
pub mod engine;
pub mod error;
pub mod toolbar;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capability::{Plugin, SOURCE_EDITING};
    pub use crate::config::EditorConfig;
    pub use crate::dom::{ElementId, EventKind, Page};
    pub use crate::editor::{Assembler, EditorInstance, Mount, SourceModeState, create};
    pub use crate::engine::{Engine, EngineEditor, HeadlessEngine};
    pub use crate::error::AssembleError;
    pub use crate::toolbar::{RemovalPolicy, Resolver, resolve};
}
