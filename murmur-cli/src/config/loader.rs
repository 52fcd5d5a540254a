use super::types::{
    DEFAULT_HOST_NAME, DEFAULT_VOICE_DISTANCE, HostSection, MurmurConfig, PluginsSection,
    RawHostSection, RawMurmurConfig, RawPluginsSection,
};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading a config layer
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<MurmurConfig, ConfigError> {
        Self::load_layers(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Merge the given layers; missing files are skipped
    pub fn load_layers(user: Option<&Path>, project: &Path) -> Result<MurmurConfig, ConfigError> {
        let mut raw = RawMurmurConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(project)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "murmur").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with MURMUR_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("MURMUR_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".murmur/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawMurmurConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawMurmurConfig, overlay: RawMurmurConfig) -> RawMurmurConfig {
        RawMurmurConfig {
            host: RawHostSection {
                name: overlay.host.name.or(base.host.name),
                voice_distance: overlay.host.voice_distance.or(base.host.voice_distance),
            },
            plugins: RawPluginsSection {
                user_dir: overlay.plugins.user_dir.or(base.plugins.user_dir),
                project_dir: overlay.plugins.project_dir.or(base.plugins.project_dir),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawMurmurConfig) -> MurmurConfig {
        let plugin_defaults = PluginsSection::default();
        MurmurConfig {
            host: HostSection {
                name: raw.host.name.unwrap_or_else(|| DEFAULT_HOST_NAME.to_string()),
                voice_distance: raw.host.voice_distance.unwrap_or(DEFAULT_VOICE_DISTANCE),
            },
            plugins: PluginsSection {
                user_dir: raw.plugins.user_dir.unwrap_or(plugin_defaults.user_dir),
                project_dir: raw.plugins.project_dir.unwrap_or(plugin_defaults.project_dir),
            },
        }
    }
}
