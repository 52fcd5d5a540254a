//! Plugin host configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the toggle file inside the user plugin directory
pub const TOGGLES_FILE: &str = "disabled.toml";

/// Where the host looks for plugin libraries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginHostConfig {
    /// User plugin directory (~/.config/murmur/plugins)
    pub user_plugin_dir: PathBuf,
    /// Project-level plugin directory (.murmur/plugins)
    #[serde(default)]
    pub project_plugin_dir: Option<PathBuf>,
}

impl Default for PluginHostConfig {
    fn default() -> Self {
        Self {
            user_plugin_dir: murmur_paths::plugin_dir(),
            project_plugin_dir: None,
        }
    }
}

impl PluginHostConfig {
    /// Directories to scan, project first so its plugins shadow user ones
    pub fn plugin_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(2);
        if let Some(project_dir) = &self.project_plugin_dir {
            dirs.push(project_dir.clone());
        }
        dirs.push(self.user_plugin_dir.clone());
        dirs
    }

    pub fn toggles_path(&self) -> PathBuf {
        self.user_plugin_dir.join(TOGGLES_FILE)
    }
}
