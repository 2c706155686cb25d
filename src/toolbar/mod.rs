//! Toolbar resolution.
//!
//! Given the buttons a toolbar asks for, work out which plugins the editor
//! has to load. Plugins that no row of the dependency table governs are
//! always kept; gated plugins are dropped once none of their buttons are
//! requested.

use std::collections::HashSet;

use crate::capability::{ALL_PLUGINS, BUTTON_DEPENDENCIES, ButtonDependency, Plugin};
use crate::error::ResolutionError;

/// How a plugin listed in several dependency rows is treated when only some
/// of those rows are requested.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Drop a plugin only when every row that lists it is unrequested.
    #[default]
    AllOwnersReject,
    /// Drop a plugin as soon as any unrequested row lists it.
    ///
    /// This can strip a plugin that a requested button still needs (for
    /// example `LinkImage` when only `link` is on the toolbar).
    Eager,
}

/// Resolves toolbars against a plugin registry and a dependency table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a [Plugin],
    table: &'a [ButtonDependency],
    policy: RemovalPolicy,
}

impl Resolver<'static> {
    /// Resolver over the built-in registry and dependency table.
    pub const fn builtin() -> Self {
        Self {
            registry: ALL_PLUGINS,
            table: BUTTON_DEPENDENCIES,
            policy: RemovalPolicy::AllOwnersReject,
        }
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> Resolver<'a> {
    /// Build a resolver over a custom registry and table.
    ///
    /// # Errors
    /// Returns [`ResolutionError`] if the registry repeats a plugin, or a
    /// table row is empty or names a plugin the registry does not hold.
    pub fn new(
        registry: &'a [Plugin],
        table: &'a [ButtonDependency],
    ) -> Result<Self, ResolutionError> {
        validate(registry, table)?;
        Ok(Self {
            registry,
            table,
            policy: RemovalPolicy::default(),
        })
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: RemovalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    pub const fn registry(&self) -> &'a [Plugin] {
        self.registry
    }

    /// Plugins needed for `requested`, in registry order.
    ///
    /// `None` means the toolbar was left unspecified and every plugin is
    /// loaded. The result only depends on which buttons are present, not on
    /// their order or how often they repeat.
    pub fn resolve<S: AsRef<str>>(&self, requested: Option<&[S]>) -> Vec<Plugin> {
        let Some(requested) = requested else {
            return self.registry.to_vec();
        };

        let (accepted, rejected): (Vec<&ButtonDependency>, Vec<&ButtonDependency>) = self
            .table
            .iter()
            .partition(|row| row.is_requested(requested));

        let removed: HashSet<Plugin> = match self.policy {
            RemovalPolicy::Eager => rejected
                .iter()
                .flat_map(|row| row.plugins.iter().copied())
                .collect(),
            RemovalPolicy::AllOwnersReject => {
                let needed: HashSet<Plugin> = accepted
                    .iter()
                    .flat_map(|row| row.plugins.iter().copied())
                    .collect();
                rejected
                    .iter()
                    .flat_map(|row| row.plugins.iter().copied())
                    .filter(|plugin| !needed.contains(plugin))
                    .collect()
            }
        };

        let kept: Vec<Plugin> = self
            .registry
            .iter()
            .copied()
            .filter(|plugin| !removed.contains(plugin))
            .collect();

        tracing::debug!(
            requested = requested.len(),
            kept = kept.len(),
            removed = self.registry.len() - kept.len(),
            policy = ?self.policy,
            "resolved toolbar plugins"
        );
        kept
    }

    /// Plugins that no dependency row governs. These survive any toolbar.
    pub fn ungated(&self) -> Vec<Plugin> {
        self.registry
            .iter()
            .copied()
            .filter(|plugin| !self.table.iter().any(|row| row.owns(*plugin)))
            .collect()
    }
}

/// Resolve `requested` against the built-in tables.
pub fn resolve<S: AsRef<str>>(requested: Option<&[S]>) -> Vec<Plugin> {
    Resolver::builtin().resolve(requested)
}

fn validate(registry: &[Plugin], table: &[ButtonDependency]) -> Result<(), ResolutionError> {
    let mut registered = HashSet::with_capacity(registry.len());
    for plugin in registry {
        if !registered.insert(*plugin) {
            return Err(ResolutionError::DuplicatePlugin(plugin.name()));
        }
    }

    for (row, dependency) in table.iter().enumerate() {
        if dependency.buttons.is_empty() {
            return Err(ResolutionError::NoButtons(row));
        }
        if dependency.plugins.is_empty() {
            return Err(ResolutionError::NoPlugins(row));
        }
        if let Some(plugin) = dependency
            .plugins
            .iter()
            .find(|plugin| !registered.contains(*plugin))
        {
            return Err(ResolutionError::UnknownPlugin {
                row,
                plugin: plugin.name(),
            });
        }
    }
    Ok(())
}
