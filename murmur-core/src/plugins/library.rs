//! Extension units backed by native shared libraries
//!
//! # Plugin Structure
//!
//! Each plugin directory contains:
//! - `<name>.so` (or `.dylib`/`.dll`, optionally `lib`-prefixed) built with
//!   [`export_plugin!`](murmur_plugin_api::export_plugin)
//!
//! Directories are scanned project first, then user; within a directory,
//! entries are visited in name order. A name found in an earlier directory
//! shadows the same name in a later one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use murmur_plugin_api::{Plugin, PluginError};

use super::discovery::{ExtensionUnit, PluginExport};
use super::error::PluginHostError;
use super::toggles::PluginToggles;
use crate::config::PluginHostConfig;

const CREATE_SYMBOL: &[u8] = b"_murmur_plugin_create";
const API_VERSION_SYMBOL: &[u8] = b"_murmur_plugin_api_version";

/// A plugin library loaded from a plugin directory
pub struct LibraryUnit {
    name: String,
    path: PathBuf,
    library: Arc<Library>,
}

impl LibraryUnit {
    /// Load the library for the plugin named after its directory
    pub fn load(dir: &Path, name: &str) -> Result<Self, PluginHostError> {
        let path = find_library(dir, name)?;

        // SAFETY: the library sits in a plugin directory the user installed
        // it into, and is expected to follow the export_plugin! contract.
        let library = unsafe { Library::new(&path)? };

        Ok(Self {
            name: name.to_string(),
            path,
            library: Arc::new(library),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExtensionUnit for LibraryUnit {
    fn unit_id(&self) -> &str {
        &self.name
    }

    fn exports(&self) -> Result<Vec<PluginExport>, PluginError> {
        // SAFETY: calling a C function exported by the plugin library.
        let api_version = unsafe {
            let version_fn = self
                .library
                .get::<extern "C" fn() -> u32>(API_VERSION_SYMBOL)
                .map_err(|e| PluginError::Unsupported(e.to_string()))?;
            version_fn()
        };

        let library = Arc::clone(&self.library);
        let export = PluginExport::new(self.name.clone(), move || {
            // SAFETY: the create function hands over ownership of a boxed
            // plugin allocated by Box::into_raw.
            unsafe {
                let create_fn = library
                    .get::<extern "C" fn() -> *mut dyn Plugin>(CREATE_SYMBOL)
                    .map_err(|e| PluginError::Unsupported(e.to_string()))?;
                let raw = create_fn();
                if raw.is_null() {
                    return Err(PluginError::custom("plugin constructor returned null"));
                }
                Ok(Box::from_raw(raw))
            }
        });

        Ok(vec![
            export
                .with_api_version(api_version)
                .with_library(Arc::clone(&self.library)),
        ])
    }
}

/// Load every enabled plugin library from the configured directories.
///
/// Libraries that fail to load are logged and skipped.
pub fn scan_plugin_dirs(
    config: &PluginHostConfig,
    toggles: &PluginToggles,
) -> Vec<Box<dyn ExtensionUnit>> {
    let mut units: Vec<Box<dyn ExtensionUnit>> = Vec::new();
    let mut seen = HashSet::new();

    for (name, dir) in plugin_candidates(config) {
        if !seen.insert(name.clone()) {
            tracing::debug!(plugin = %name, dir = %dir.display(), "Plugin shadowed by earlier directory");
            continue;
        }

        if !toggles.is_enabled(&name) {
            tracing::debug!(plugin = %name, "Plugin disabled, skipping");
            continue;
        }

        match LibraryUnit::load(&dir, &name) {
            Ok(unit) => {
                tracing::debug!(plugin = %name, path = %unit.path().display(), "Plugin library loaded");
                units.push(Box::new(unit));
            }
            Err(e) => {
                tracing::error!(plugin = %name, error = %e, "Failed to load plugin library");
            }
        }
    }

    units
}

/// Plugin directories as (name, path), in scan order
pub fn plugin_candidates(config: &PluginHostConfig) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();

    for base_dir in config.plugin_dirs() {
        let entries = match std::fs::read_dir(&base_dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::debug!(dir = %base_dir.display(), "Plugin directory does not exist");
                continue;
            }
        };

        let mut dirs: Vec<(String, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        found.extend(dirs);
    }

    found
}

/// Find the library file in a plugin directory
fn find_library(dir: &Path, name: &str) -> Result<PathBuf, PluginHostError> {
    if !dir.is_dir() {
        return Err(PluginHostError::PluginDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let extensions: &[&str] = if cfg!(target_os = "macos") {
        &["dylib", "so"]
    } else if cfg!(target_os = "windows") {
        &["dll"]
    } else {
        &["so"]
    };

    for ext in extensions {
        let lib_path = dir.join(format!("{}.{}", name, ext));
        if lib_path.exists() {
            return Ok(lib_path);
        }

        let lib_path = dir.join(format!("lib{}.{}", name.replace('-', "_"), ext));
        if lib_path.exists() {
            return Ok(lib_path);
        }
    }

    Err(PluginHostError::LibraryNotFound {
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(user: &Path, project: Option<&Path>) -> PluginHostConfig {
        PluginHostConfig {
            user_plugin_dir: user.to_path_buf(),
            project_plugin_dir: project.map(Path::to_path_buf),
        }
    }

    #[test]
    fn test_find_library_not_found() {
        let dir = TempDir::new().unwrap();
        let result = find_library(dir.path(), "nonexistent");
        assert!(matches!(result, Err(PluginHostError::LibraryNotFound { .. })));
    }

    #[test]
    fn test_find_library_missing_dir() {
        let result = find_library(Path::new("/nonexistent/plugin"), "plugin");
        assert!(matches!(result, Err(PluginHostError::PluginDirNotFound { .. })));
    }

    #[test]
    fn test_find_library_accepts_lib_prefix() {
        let dir = TempDir::new().unwrap();
        let ext = if cfg!(target_os = "windows") {
            "dll"
        } else if cfg!(target_os = "macos") {
            "dylib"
        } else {
            "so"
        };
        let path = dir.path().join(format!("libnoise_gate.{}", ext));
        std::fs::write(&path, b"").unwrap();

        assert_eq!(find_library(dir.path(), "noise-gate").unwrap(), path);
    }

    #[test]
    fn test_candidates_are_sorted_and_project_first() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        for name in ["zeta", "alpha"] {
            std::fs::create_dir(user.path().join(name)).unwrap();
        }
        std::fs::create_dir(project.path().join("mid")).unwrap();
        std::fs::write(user.path().join("stray-file.txt"), b"").unwrap();

        let config = config_for(user.path(), Some(project.path()));
        let names: Vec<String> = plugin_candidates(&config)
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names, vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_scan_skips_missing_dirs() {
        let config = config_for(Path::new("/nonexistent/murmur/plugins"), None);
        let units = scan_plugin_dirs(&config, &PluginToggles::default());
        assert!(units.is_empty());
    }

    #[test]
    fn test_scan_skips_broken_and_disabled_libraries() {
        let user = TempDir::new().unwrap();
        // A directory without a library, and one that is disabled
        std::fs::create_dir(user.path().join("empty")).unwrap();
        std::fs::create_dir(user.path().join("off")).unwrap();

        let mut toggles = PluginToggles::default();
        toggles.disable("off");

        let units = scan_plugin_dirs(&config_for(user.path(), None), &toggles);
        assert!(units.is_empty());
    }
}
