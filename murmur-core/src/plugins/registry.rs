//! EventRegistry - the frozen mapping from event kind to ordered handlers

use serde::Serialize;

use murmur_plugin_api::{Binding, EventHandlers, EventKind, EventPayload, EventRegistrar};

use super::discovery::DiscoveredPlugin;
use super::isolation::{PluginFailure, Stage, isolate};

/// Immutable handler table built once from all plugins.
///
/// Handlers for a kind appear in plugin discovery order, and within one
/// plugin in the order it called the registrar.
#[derive(Debug, Default)]
pub struct EventRegistry {
    handlers: EventHandlers,
}

/// Bindings for one event kind, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    pub kind: String,
    pub cancellable: bool,
    /// Owning plugin of each handler, in invocation order
    pub plugins: Vec<String>,
}

impl EventRegistry {
    /// A registry with no bindings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Handlers bound to the payload's kind, in invocation order
    pub fn handlers_for<P: EventPayload>(&self) -> &[Binding<P>] {
        self.handlers.bindings::<P>()
    }

    /// Owning plugin of each handler bound to a kind
    pub fn plugin_ids(&self, kind: EventKind) -> Vec<&str> {
        self.handlers.plugin_ids(kind)
    }

    /// Total number of bindings
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Bound kinds in catalogue order, skipping kinds without handlers
    pub fn summary(&self) -> Vec<KindSummary> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.handlers.count(*kind) > 0)
            .map(|kind| KindSummary {
                kind: kind.to_string(),
                cancellable: kind.is_cancellable(),
                plugins: self.plugin_ids(kind).into_iter().map(String::from).collect(),
            })
            .collect()
    }
}

/// Offer a registrar to every plugin in discovery order, then freeze.
///
/// Each plugin gets its own registrar, and its bindings are credited to its
/// discovered id. A plugin whose `register_events` fails is logged and the
/// next plugin still registers. Bindings it added before failing are kept.
pub fn build_registry(plugins: &[DiscoveredPlugin]) -> (EventRegistry, Vec<PluginFailure>) {
    let mut handlers = EventHandlers::default();
    let mut failures = Vec::new();

    for plugin in plugins {
        tracing::info!(plugin = %plugin.id(), "Registering events");
        let mut registrar = EventRegistrar::for_plugin(plugin.id());
        if let Err(failure) = isolate(Stage::Registration, plugin.id(), || {
            plugin.plugin().register_events(&mut registrar)
        }) {
            failures.push(failure);
        }
        handlers.absorb(plugin.id(), registrar.into_handlers());
    }

    let registry = EventRegistry { handlers };
    tracing::debug!(bindings = registry.len(), "Event registry built");
    (registry, failures)
}
