use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use murmur_core::PluginHostConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMurmurConfig {
    #[serde(default)]
    pub host: RawHostSection,

    #[serde(default)]
    pub plugins: RawPluginsSection,
}

/// Host section as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawHostSection {
    pub name: Option<String>,
    pub voice_distance: Option<f64>,
}

/// Plugin section as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPluginsSection {
    pub user_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MurmurConfig {
    #[serde(default)]
    pub host: HostSection,

    #[serde(default)]
    pub plugins: PluginsSection,
}

/// How the CLI presents itself to plugins when it runs their hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSection {
    /// Host name plugins see in `HostApi::host_name`
    pub name: String,

    /// Voice distance in blocks
    pub voice_distance: f64,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_HOST_NAME.to_string(),
            voice_distance: DEFAULT_VOICE_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginsSection {
    /// User plugin directory
    pub user_dir: PathBuf,

    /// Project plugin directory, scanned before the user one
    pub project_dir: PathBuf,
}

impl Default for PluginsSection {
    fn default() -> Self {
        Self {
            user_dir: murmur_paths::plugin_dir(),
            project_dir: PathBuf::from(DEFAULT_PROJECT_PLUGIN_DIR),
        }
    }
}

impl PluginsSection {
    pub fn host_config(&self) -> PluginHostConfig {
        PluginHostConfig {
            user_plugin_dir: self.user_dir.clone(),
            project_plugin_dir: Some(self.project_dir.clone()),
        }
    }
}

/// Unit id the CLI host reports for itself during discovery
pub const DEFAULT_HOST_NAME: &str = "murmur";

pub const DEFAULT_VOICE_DISTANCE: f64 = 48.0;

pub const DEFAULT_PROJECT_PLUGIN_DIR: &str = ".murmur/plugins";
