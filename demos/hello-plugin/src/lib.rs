//! Hello Plugin - A simple example plugin for murmur
//!
//! This plugin demonstrates:
//! - Basic plugin structure with the `export_plugin!` macro
//! - Reading host settings in `initialize`
//! - Binding handlers with `add_event`, including a cancelling one
//!
//! ## Building
//!
//! ```bash
//! cargo build --release
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/.config/murmur/plugins/hello
//! cp target/release/libhello_plugin.so ~/.config/murmur/plugins/hello/hello.so
//! murmur plugin list
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use murmur_plugin_api::{
    CreateGroup, EventRegistrar, HostApi, Plugin, PlayerConnected, PlayerDisconnected,
    PluginError, export_plugin,
};

/// Greets players and refuses groups without a name.
#[derive(Default)]
pub struct HelloPlugin {
    /// Players currently connected
    online: Arc<AtomicU32>,
}

impl Plugin for HelloPlugin {
    fn plugin_id(&self) -> String {
        "hello".to_string()
    }

    fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
        tracing::info!(
            host = api.host_name(),
            voice_distance = api.voice_distance(),
            "Hello plugin loaded!"
        );
        Ok(())
    }

    fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        let online = Arc::clone(&self.online);
        registrar.add_event::<PlayerConnected, _>(move |event| {
            let now = online.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::info!(
                player = %event.payload().connection.name,
                online = now,
                "Hello, {}!",
                event.payload().connection.name
            );
        });

        let online = Arc::clone(&self.online);
        registrar.add_event::<PlayerDisconnected, _>(move |_| {
            // Saturating: a disconnect may arrive for a player seen before load
            let _ = online.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        });

        registrar.add_event::<CreateGroup, _>(|event| {
            if event.payload().group.name.trim().is_empty() {
                tracing::info!(player = %event.payload().connection.name, "Refusing unnamed group");
                event.cancel();
            }
        });

        Ok(())
    }
}

// This macro generates the C ABI entry points for dynamic loading
export_plugin!(HelloPlugin);
