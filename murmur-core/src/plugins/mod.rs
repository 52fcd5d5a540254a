//! Plugin system for murmur
//!
//! Startup runs in three blocking phases, each completing before the next
//! begins and before any event is dispatched:
//!
//! 1. [`discover_plugins`]: construct plugins from every [`ExtensionUnit`]
//!    except the host's own
//! 2. [`initialize_plugin`]: hand each plugin its [`HostApi`](murmur_plugin_api::HostApi)
//! 3. [`build_registry`]: offer each plugin the registrar, then freeze the
//!    bindings into an [`EventRegistry`]
//!
//! [`PluginManager`] runs the phases and owns the result; after that,
//! [`dispatch`] delivers events synchronously on the caller's thread.
//! Every call into plugin code goes through [`isolate`], so a plugin that
//! errors or panics never takes the host down.
//!
//! # Plugin Discovery
//!
//! Native plugins are loaded from two directories:
//! 1. Project plugins: `.murmur/plugins/` (takes precedence)
//! 2. User plugins: `~/.config/murmur/plugins/`
//!
//! # Example
//!
//! ```ignore
//! use murmur_core::plugins::{PluginManager, PluginToggles, scan_plugin_dirs};
//! use murmur_core::PluginHostConfig;
//!
//! let config = PluginHostConfig::default();
//! let toggles = PluginToggles::load(&config.toggles_path())?;
//! let units = scan_plugin_dirs(&config, &toggles);
//!
//! let manager = PluginManager::start(&units, "murmur", &host_api);
//! if manager.on_join_group(&server, connection, Some(group)) {
//!     // a plugin vetoed the join
//! }
//! ```

mod adapter;
mod discovery;
mod dispatch;
mod error;
mod initializer;
mod isolation;
mod library;
mod manager;
mod registry;
mod toggles;

#[cfg(test)]
mod test_support;

pub use adapter::SoundPacket;
pub use discovery::{DiscoveredPlugin, ExtensionUnit, PluginExport, StaticUnit, discover_plugins};
pub use dispatch::dispatch;
pub use error::PluginHostError;
pub use initializer::initialize_plugin;
pub use isolation::{FailureCause, PluginFailure, Stage, isolate};
pub use library::{LibraryUnit, plugin_candidates, scan_plugin_dirs};
pub use manager::{PluginInfo, PluginManager, PluginState};
pub use registry::{EventRegistry, KindSummary, build_registry};
pub use toggles::PluginToggles;
