//! murmur-core: plugin host for the murmur voice chat server
//!
//! This crate loads murmur plugins and routes server events to them:
//!
//! - **Discovery** - [`plugins::ExtensionUnit`] for anything that exports
//!   plugins, with [`plugins::LibraryUnit`] for native shared libraries
//! - **Startup** - [`PluginManager::start`] runs discovery, initialization
//!   and registration once, in that order
//! - **Dispatch** - typed, cancellable events delivered in registration order
//! - **Host adapter** - `on_*` shims on [`PluginManager`] that turn server
//!   callbacks into events and read back the results
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use murmur_core::PluginManager;
//! use murmur_core::plugins::{ExtensionUnit, StaticUnit};
//! use murmur_plugin_api::{
//!     EventRegistrar, OfflineServer, Plugin, PluginError, ServerApi, VoiceHost,
//! };
//!
//! struct Relay;
//!
//! impl Plugin for Relay {
//!     fn plugin_id(&self) -> String {
//!         "relay".to_string()
//!     }
//!
//!     fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
//!         registrar.add_event::<VoiceHost, _>(|event| {
//!             event.payload_mut().set_voice_host("relay.example:24454");
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let units: Vec<Box<dyn ExtensionUnit>> = vec![Box::new(
//!     StaticUnit::new("relay-mod").with_plugin("relay", || Ok(Box::new(Relay))),
//! )];
//! let manager = PluginManager::start(&units, "murmur", &OfflineServer::default());
//!
//! let server: Arc<dyn ServerApi> = Arc::new(OfflineServer::default());
//! assert_eq!(manager.voice_host(&server, "mc.example"), "relay.example:24454");
//! ```

pub mod config;
pub mod plugins;

pub use config::PluginHostConfig;
pub use plugins::{
    EventRegistry, PluginFailure, PluginHostError, PluginInfo, PluginManager, PluginState,
};
