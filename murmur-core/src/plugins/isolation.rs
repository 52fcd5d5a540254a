//! The single boundary every call into plugin code goes through.
//!
//! [`isolate`] runs a plugin-supplied closure with panic isolation, turns an
//! `Err` or a panic into a [`PluginFailure`] tagged with the pipeline stage,
//! and logs it. Callers decide what to do next; they never see a panic.
//!
//! The `catch_unwind` here only covers plugins compiled into the host.
//! Library plugins catch their own panics before returning, via
//! [`murmur_plugin_api::guard`], and report them as
//! [`PluginError::Panicked`].

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use murmur_plugin_api::{EventKind, PluginError, panic_message};
use thiserror::Error;

/// Pipeline stage a plugin call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Initialization,
    Registration,
    Dispatch(EventKind),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Discovery => f.write_str("discovery"),
            Stage::Initialization => f.write_str("initialization"),
            Stage::Registration => f.write_str("registration"),
            Stage::Dispatch(kind) => write!(f, "dispatch of {}", kind),
        }
    }
}

/// How a plugin call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The plugin returned an error
    Error(String),
    /// The plugin panicked
    Panic(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Error(message) => f.write_str(message),
            FailureCause::Panic(message) => write!(f, "panicked: {}", message),
        }
    }
}

/// A failed plugin call. None of these are fatal to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginFailure {
    /// A candidate could not be extracted; it is skipped
    #[error("Failed to load plugin '{plugin}': {cause}")]
    Discovery { plugin: String, cause: FailureCause },

    /// `initialize` failed; the plugin stays in the list
    #[error("Plugin '{plugin}' failed to initialize: {cause}")]
    Init { plugin: String, cause: FailureCause },

    /// `register_events` failed; other plugins still register
    #[error("Plugin '{plugin}' failed to register events: {cause}")]
    Registration { plugin: String, cause: FailureCause },

    /// A handler failed; remaining handlers still run
    #[error("Handler from plugin '{plugin}' failed during {kind}: {cause}")]
    Dispatch {
        plugin: String,
        kind: EventKind,
        cause: FailureCause,
    },
}

impl PluginFailure {
    fn new(stage: Stage, plugin: &str, cause: FailureCause) -> Self {
        let plugin = plugin.to_string();
        match stage {
            Stage::Discovery => PluginFailure::Discovery { plugin, cause },
            Stage::Initialization => PluginFailure::Init { plugin, cause },
            Stage::Registration => PluginFailure::Registration { plugin, cause },
            Stage::Dispatch(kind) => PluginFailure::Dispatch {
                plugin,
                kind,
                cause,
            },
        }
    }

    /// Plugin (or discovery candidate) the failure belongs to
    pub fn plugin(&self) -> &str {
        match self {
            PluginFailure::Discovery { plugin, .. }
            | PluginFailure::Init { plugin, .. }
            | PluginFailure::Registration { plugin, .. }
            | PluginFailure::Dispatch { plugin, .. } => plugin,
        }
    }

    pub fn cause(&self) -> &FailureCause {
        match self {
            PluginFailure::Discovery { cause, .. }
            | PluginFailure::Init { cause, .. }
            | PluginFailure::Registration { cause, .. }
            | PluginFailure::Dispatch { cause, .. } => cause,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PluginFailure::Discovery { .. } => Stage::Discovery,
            PluginFailure::Init { .. } => Stage::Initialization,
            PluginFailure::Registration { .. } => Stage::Registration,
            PluginFailure::Dispatch { kind, .. } => Stage::Dispatch(*kind),
        }
    }
}

/// Run one plugin call with panic isolation.
///
/// The failure, if any, is logged here; discovery failures at `warn`,
/// everything else at `error`.
pub fn isolate<T>(
    stage: Stage,
    plugin: &str,
    call: impl FnOnce() -> Result<T, PluginError>,
) -> Result<T, PluginFailure> {
    let cause = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(PluginError::Panicked(message))) => FailureCause::Panic(message),
        Ok(Err(e)) => FailureCause::Error(e.to_string()),
        Err(payload) => FailureCause::Panic(panic_message(payload.as_ref())),
    };

    match stage {
        Stage::Discovery => {
            tracing::warn!(plugin = %plugin, stage = %stage, error = %cause, "Plugin call failed");
        }
        _ => {
            tracing::error!(plugin = %plugin, stage = %stage, error = %cause, "Plugin call failed");
        }
    }

    Err(PluginFailure::new(stage, plugin, cause))
}
