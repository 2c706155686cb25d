use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::capability::Plugin;
use crate::error::ConfigError;

/// Key holding the requested toolbar buttons.
pub const TOOLBAR_KEY: &str = "toolbar";
/// Key holding the plugin list handed to the engine. Always overwritten by
/// toolbar resolution.
pub const PLUGINS_KEY: &str = "plugins";

/// Open editor configuration record.
///
/// Everything except `plugins` is passed to the engine untouched; `toolbar`
/// is additionally read to decide which plugins to load.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorConfig {
    fields: Map<String, Value>,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotAnObject`] for any other JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ConfigError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn with_toolbar<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = buttons
            .into_iter()
            .map(|b| Value::String(b.into()))
            .collect();
        self.fields
            .insert(TOOLBAR_KEY.to_string(), Value::Array(items));
        self
    }

    /// The requested toolbar buttons, or `None` when no toolbar is set.
    ///
    /// Accepts a plain list of button names or the long form
    /// `{ "items": [...] }`. A `null` toolbar counts as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for any other shape or for non-string items.
    pub fn toolbar(&self) -> Result<Option<Vec<String>>, ConfigError> {
        let items = match self.fields.get(TOOLBAR_KEY) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(Value::Object(long_form)) => match long_form.get("items") {
                Some(Value::Array(items)) => items,
                _ => return Err(ConfigError::InvalidToolbar),
            },
            Some(_) => return Err(ConfigError::InvalidToolbar),
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_str()
                    .map(ToOwned::to_owned)
                    .ok_or(ConfigError::InvalidToolbarItem(idx))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Copy of this config with `plugins` replaced by `plugins`.
    pub fn with_plugins(&self, plugins: &[Plugin]) -> Self {
        let mut merged = self.clone();
        let names = plugins
            .iter()
            .map(|p| Value::String(p.name().to_string()))
            .collect();
        merged
            .fields
            .insert(PLUGINS_KEY.to_string(), Value::Array(names));
        merged
    }

    /// Merge two configs; keys set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &other.fields {
            merged.fields.insert(key.clone(), value.clone());
        }
        merged
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read an editor config from a JSON file. A missing file yields an empty
/// config.
pub fn load_editor_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        return Ok(EditorConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    EditorConfig::from_value(value)
        .with_context(|| format!("Invalid config {}", path.display()))
}

pub fn save_editor_config(path: &Path, config: &EditorConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, format!("{content}\n"))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_editor_config(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
