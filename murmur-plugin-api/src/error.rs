//! Error types for plugin authors

use thiserror::Error;

/// Errors that plugins can return from their hooks and handlers
#[derive(Error, Debug)]
pub enum PluginError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A custom socket implementation failed
    #[error("Socket error: {0}")]
    Socket(String),

    /// The plugin cannot run against this host
    #[error("Unsupported host: {0}")]
    Unsupported(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),

    /// The plugin panicked and the panic was caught inside the plugin
    #[error("panicked: {0}")]
    Panicked(String),
}

impl PluginError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a socket error
    pub fn socket(message: impl Into<String>) -> Self {
        Self::Socket(message.into())
    }
}
