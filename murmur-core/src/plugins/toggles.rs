//! Plugin toggles - tracks which installed plugin units are switched off

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use super::error::PluginHostError;

/// Installed plugin units that should not be loaded.
///
/// Stored as TOML in `~/.config/murmur/plugins/disabled.toml`. Units are
/// enabled unless listed here.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PluginToggles {
    /// Names of disabled plugin units
    #[serde(default)]
    pub disabled: BTreeSet<String>,
}

impl PluginToggles {
    /// Load toggles from a TOML file
    ///
    /// Returns an empty set if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, PluginHostError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PluginHostError::Toggles(e.to_string()))
    }

    /// Save toggles to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), PluginHostError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PluginHostError::Toggles(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.contains(name)
    }

    pub fn enable(&mut self, name: &str) {
        self.disabled.remove(name);
    }

    pub fn disable(&mut self, name: &str) {
        self.disabled.insert(name.to_string());
    }

    /// Disabled units in name order
    pub fn disabled_units(&self) -> impl Iterator<Item = &str> {
        self.disabled.iter().map(String::as_str)
    }
}
