//! XDG Base Directory paths for murmur.
//!
//! The host and its CLI resolve plugin directories through XDG paths on
//! every platform, so a plugin installed by hand lands in the same place
//! the host scans.

use std::path::PathBuf;

const APP_DIR: &str = "murmur";

/// Get the murmur config directory.
///
/// Returns `$XDG_CONFIG_HOME/murmur` if set, otherwise `~/.config/murmur`.
/// Plugins live under `plugins/` inside this directory.
///
/// # Examples
///
/// ```
/// use murmur_paths::config_dir;
///
/// let plugin_dir = config_dir().join("plugins");
/// assert!(plugin_dir.ends_with("murmur/plugins"));
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join(APP_DIR)
    } else {
        PathBuf::from(".config").join(APP_DIR)
    }
}

/// Get the murmur data directory.
///
/// Returns `$XDG_DATA_HOME/murmur` if set, otherwise `~/.local/share/murmur`.
/// Plugins that keep state on disk are pointed here.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share").join(APP_DIR)
    } else {
        PathBuf::from(".local/share").join(APP_DIR)
    }
}

/// Default directory scanned for user-installed plugins.
pub fn plugin_dir() -> PathBuf {
    config_dir().join("plugins")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_murmur() {
        let path = config_dir();
        assert!(path.ends_with("murmur"), "config_dir should end with 'murmur'");
    }

    #[test]
    fn test_data_dir_ends_with_murmur() {
        let path = data_dir();
        assert!(path.ends_with("murmur"), "data_dir should end with 'murmur'");
    }

    #[test]
    fn test_plugin_dir_is_under_config_dir() {
        assert!(plugin_dir().ends_with("murmur/plugins"));
    }

    #[test]
    fn test_data_dir_respects_xdg_env() {
        unsafe {
            std::env::set_var("XDG_DATA_HOME", "/tmp/murmur-test-data");
        }
        let path = data_dir();
        assert_eq!(path, PathBuf::from("/tmp/murmur-test-data/murmur"));
        unsafe {
            std::env::remove_var("XDG_DATA_HOME");
        }
    }
}
