//! Event dispatch

use murmur_plugin_api::{Event, EventPayload};

use super::isolation::{Stage, isolate};
use super::registry::EventRegistry;

/// Run every handler bound to the event's kind, in registry order.
///
/// A handler that fails or panics is logged and skipped. Once a handler
/// returns with the event cancelled, no later handler runs. Returns whether
/// the event ended up cancelled.
pub fn dispatch<P: EventPayload>(registry: &EventRegistry, event: &mut Event<P>) -> bool {
    let handlers = registry.handlers_for::<P>();
    if handlers.is_empty() {
        return event.is_cancelled();
    }

    for binding in handlers {
        let outcome = isolate(Stage::Dispatch(P::KIND), binding.plugin_id(), || {
            binding.invoke(event)
        });
        if outcome.is_ok() && event.is_cancelled() {
            tracing::debug!(plugin = %binding.plugin_id(), kind = %P::KIND, "Event cancelled");
            break;
        }
    }

    event.is_cancelled()
}
