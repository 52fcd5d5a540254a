//! Plugin host error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the host itself, outside any plugin call
#[derive(Error, Debug)]
pub enum PluginHostError {
    /// Plugin directory not found
    #[error("Plugin directory not found: {path}")]
    PluginDirNotFound { path: PathBuf },

    /// Plugin library not found in directory
    #[error("Plugin library not found in {dir}")]
    LibraryNotFound { dir: PathBuf },

    /// Failed to load dynamic library
    #[error("Failed to load plugin library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    /// Toggle file could not be parsed or written
    #[error("Plugin toggles error: {0}")]
    Toggles(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
