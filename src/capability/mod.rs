//! Editing capabilities and the toolbar buttons that gate them.
//!
//! Both tables are plain static data. The [`toolbar`](crate::toolbar)
//! resolver reads them to decide which capabilities an editor loads.

mod registry;
mod table;

pub use registry::{ALL_PLUGINS, Plugin, SOURCE_EDITING, find_plugin, plugin_names};
pub use table::{BUTTON_DEPENDENCIES, ButtonDependency};
