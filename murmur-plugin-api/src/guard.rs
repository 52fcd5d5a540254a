//! Panic containment on the plugin's side of the library boundary
//!
//! A plugin library links its own copy of std, so a panic unwinding out of
//! it cannot be caught by the host and aborts the process. Everything here
//! is generic and therefore compiled into the plugin: hooks and handlers
//! catch their own panics and hand the host a [`PluginError::Panicked`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::PluginError;
use crate::registrar::EventRegistrar;
use crate::{HostApi, Plugin};

/// Run a plugin call, turning a panic into [`PluginError::Panicked`]
pub fn guarded<T>(call: impl FnOnce() -> Result<T, PluginError>) -> Result<T, PluginError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(PluginError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Wraps an exported plugin so its hooks never unwind into the host.
///
/// [`export_plugin!`](crate::export_plugin) boxes every plugin in one of
/// these.
pub struct Guarded<T> {
    inner: T,
}

impl<T: Plugin> Guarded<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Plugin> Plugin for Guarded<T> {
    fn plugin_id(&self) -> String {
        guarded(|| Ok(self.inner.plugin_id()))
            .unwrap_or_else(|_| std::any::type_name::<T>().to_string())
    }

    fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
        guarded(|| self.inner.initialize(api))
    }

    fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        guarded(|| self.inner.register_events(registrar))
    }
}
