//! PluginManager - owns the plugins and the frozen event registry

use serde::Serialize;

use murmur_plugin_api::{Event, EventPayload, HostApi};

use super::discovery::{DiscoveredPlugin, ExtensionUnit, discover_plugins};
use super::dispatch::dispatch;
use super::initializer::initialize_plugin;
use super::isolation::PluginFailure;
use super::registry::{EventRegistry, build_registry};

/// Outcome of the startup hooks for one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PluginState {
    /// Initialized and registered without error
    Ready,
    /// `initialize` failed; any bindings it registered are still live
    InitFailed { error: String },
    /// `register_events` failed; bindings added before the failure are live
    RegistrationFailed { error: String },
}

/// Information about a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub id: String,
    /// Unit the plugin was discovered in
    pub unit: String,
    pub export: String,
    #[serde(flatten)]
    pub state: PluginState,
}

struct LoadedPlugin {
    plugin: DiscoveredPlugin,
    state: PluginState,
}

/// Runs the plugin pipeline once and then dispatches events.
///
/// Field order matters: handlers in the registry may hold code from plugin
/// libraries, so the registry is dropped before the plugins.
pub struct PluginManager {
    registry: EventRegistry,
    plugins: Vec<LoadedPlugin>,
    failures: Vec<PluginFailure>,
}

impl PluginManager {
    /// A manager with no plugins, for hosts that start without any
    pub fn empty() -> Self {
        Self {
            registry: EventRegistry::empty(),
            plugins: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Discover, initialize and register every plugin, in that order.
    ///
    /// Never fails: every plugin failure is logged and kept in
    /// [`failures`](Self::failures).
    pub fn start(units: &[Box<dyn ExtensionUnit>], self_id: &str, api: &dyn HostApi) -> Self {
        tracing::info!("Loading plugins");
        let (mut discovered, mut failures) = discover_plugins(units, self_id);
        tracing::info!(count = discovered.len(), "Loaded {} plugin(s)", discovered.len());

        tracing::info!("Initializing plugins");
        let mut states: Vec<PluginState> = discovered
            .iter_mut()
            .map(|plugin| match initialize_plugin(plugin, api) {
                Ok(()) => PluginState::Ready,
                Err(failure) => {
                    let state = PluginState::InitFailed {
                        error: failure.cause().to_string(),
                    };
                    failures.push(failure);
                    state
                }
            })
            .collect();
        tracing::info!(count = discovered.len(), "Initialized {} plugin(s)", discovered.len());

        let (registry, registration_failures) = build_registry(&discovered);
        for failure in registration_failures {
            let position = discovered.iter().position(|p| p.id() == failure.plugin());
            // An earlier init failure stays the reported state
            if let Some(i) = position
                && states[i] == PluginState::Ready
            {
                states[i] = PluginState::RegistrationFailed {
                    error: failure.cause().to_string(),
                };
            }
            failures.push(failure);
        }

        let plugins = discovered
            .into_iter()
            .zip(states)
            .map(|(plugin, state)| LoadedPlugin { plugin, state })
            .collect();

        Self {
            registry,
            plugins,
            failures,
        }
    }

    /// Deliver an event to its handlers. Returns whether it was cancelled.
    pub fn dispatch<P: EventPayload>(&self, event: &mut Event<P>) -> bool {
        dispatch(&self.registry, event)
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Number of plugins that survived discovery
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// All plugins, in discovery order
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(LoadedPlugin::info).collect()
    }

    pub fn get_plugin_info(&self, id: &str) -> Option<PluginInfo> {
        self.plugins
            .iter()
            .find(|loaded| loaded.plugin.id() == id)
            .map(LoadedPlugin::info)
    }

    /// Failures recorded during startup
    pub fn failures(&self) -> &[PluginFailure] {
        &self.failures
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::empty()
    }
}

impl LoadedPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: self.plugin.id().to_string(),
            unit: self.plugin.unit().to_string(),
            export: self.plugin.export().to_string(),
            state: self.state.clone(),
        }
    }
}
