//! murmur-plugin-api - Plugin API for the murmur voice chat server
//!
//! This crate provides the traits and types needed to write murmur plugins.
//! Plugins are native Rust dynamic libraries. The host hands each plugin a
//! [`HostApi`] handle at startup, then offers it an [`EventRegistrar`] to
//! bind handlers to the events it cares about.
//!
//! # Example
//!
//! ```ignore
//! use murmur_plugin_api::{
//!     export_plugin, EventRegistrar, HostApi, MicrophonePacketEvent, Plugin, PluginError,
//! };
//!
//! #[derive(Default)]
//! pub struct MutePlugin;
//!
//! impl Plugin for MutePlugin {
//!     fn plugin_id(&self) -> String {
//!         "mute".to_string()
//!     }
//!
//!     fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
//!         tracing::info!(host = api.host_name(), "Mute plugin ready");
//!         Ok(())
//!     }
//!
//!     fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
//!         registrar.add_event::<MicrophonePacketEvent, _>(|event| {
//!             if event.payload().sender.name == "griefer" {
//!                 event.cancel();
//!             }
//!         });
//!         Ok(())
//!     }
//! }
//!
//! export_plugin!(MutePlugin);
//! ```

pub mod api;
pub mod error;
pub mod event;
pub mod guard;
pub mod registrar;
pub mod types;

pub use api::{HostApi, OfflineServer, ServerApi};
pub use error::PluginError;
pub use guard::{Guarded, guarded, panic_message};
pub use event::{
    CreateGroup, EntitySoundPacketEvent, Event, EventKind, EventPayload, JoinGroup, LeaveGroup,
    LocationalSoundPacketEvent, MicrophonePacketEvent, PlayerConnected, PlayerDisconnected,
    ServerStarted, ServerStarting, ServerStopped, StaticSoundPacketEvent, VoiceHost,
};
pub use registrar::{Binding, EventHandlers, EventRegistrar, HandlerFn};
pub use types::*;

/// Current plugin API version. Plugins must match this exactly.
/// This is checked during discovery; mismatching plugins are skipped.
pub const API_VERSION: u32 = 1;

/// The core plugin trait - implement this to create a murmur plugin.
///
/// Both hooks default to no-ops, so a plugin only overrides what it needs.
pub trait Plugin: Send + Sync {
    /// Unique identifier, used in logs and binding attribution
    fn plugin_id(&self) -> String;

    /// Called once after discovery, before any event registration.
    ///
    /// A failure here is logged by the host; the plugin is still offered
    /// the registrar afterwards.
    fn initialize(&mut self, _api: &dyn HostApi) -> Result<(), PluginError> {
        Ok(())
    }

    /// Bind handlers to events. Called once, in discovery order.
    fn register_events(&self, _registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Export a plugin type for dynamic loading.
///
/// This macro generates the C ABI entry points that murmur uses to load
/// plugins from a shared library.
///
/// # Usage
///
/// ```ignore
/// murmur_plugin_api::export_plugin!(MyPlugin);
/// ```
///
/// # Generated Functions
///
/// - `_murmur_plugin_create()`: Creates a new plugin instance, or returns
///   null if its `Default` impl panics
/// - `_murmur_plugin_api_version()`: Returns the API version
/// - `_murmur_plugin_destroy()`: Destroys a plugin instance
///
/// The instance is wrapped in [`Guarded`], so a panic in `initialize` or
/// `register_events` comes back to the host as [`PluginError::Panicked`]
/// instead of unwinding across the library boundary.
#[macro_export]
macro_rules! export_plugin {
    ($plugin_type:ty) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _murmur_plugin_create() -> *mut dyn $crate::Plugin {
            match ::std::panic::catch_unwind(|| <$plugin_type>::default()) {
                Ok(plugin) => {
                    let plugin: Box<dyn $crate::Plugin> = Box::new($crate::Guarded::new(plugin));
                    Box::into_raw(plugin)
                }
                Err(_) => ::std::ptr::null_mut::<$crate::Guarded<$plugin_type>>()
                    as *mut dyn $crate::Plugin,
            }
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _murmur_plugin_api_version() -> u32 {
            $crate::API_VERSION
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _murmur_plugin_destroy(ptr: *mut dyn $crate::Plugin) {
            if !ptr.is_null() {
                unsafe {
                    drop(Box::from_raw(ptr));
                }
            }
        }
    };
}
