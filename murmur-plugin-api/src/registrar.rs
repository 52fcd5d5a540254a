//! EventRegistrar - how plugins bind handlers to event kinds
//!
//! The host hands each plugin its own registrar and merges the result with
//! [`EventHandlers::absorb`], in plugin order. Each call to
//! [`EventRegistrar::add_event`] appends a [`Binding`] to the list for that
//! payload's kind, so the final order is plugin order first and call order
//! within a plugin second.

use std::fmt;
use std::sync::Arc;

use crate::error::PluginError;
use crate::event::{
    CreateGroup, EntitySoundPacketEvent, Event, EventKind, EventPayload, JoinGroup, LeaveGroup,
    LocationalSoundPacketEvent, MicrophonePacketEvent, PlayerConnected, PlayerDisconnected,
    Sealed, ServerStarted, ServerStarting, ServerStopped, StaticSoundPacketEvent, VoiceHost,
};
use crate::guard::guarded;

/// Handler signature stored for a payload type
pub type HandlerFn<P> = dyn Fn(&mut Event<P>) -> Result<(), PluginError> + Send + Sync;

/// One handler together with the plugin that registered it
pub struct Binding<P> {
    plugin_id: Arc<str>,
    handler: Box<HandlerFn<P>>,
}

impl<P> Binding<P> {
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Run the handler against an event
    pub fn invoke(&self, event: &mut Event<P>) -> Result<(), PluginError> {
        (self.handler)(event)
    }
}

impl<P> fmt::Debug for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("plugin_id", &self.plugin_id)
            .finish_non_exhaustive()
    }
}

macro_rules! event_catalogue {
    ($($field:ident: $payload:ty => $kind:ident),* $(,)?) => {
        /// Ordered handler lists, one per event kind
        #[derive(Default)]
        pub struct EventHandlers {
            $($field: Vec<Binding<$payload>>,)*
        }

        impl EventHandlers {
            /// Plugin ids of the bindings for a kind, in invocation order
            pub fn plugin_ids(&self, kind: EventKind) -> Vec<&str> {
                match kind {
                    $(EventKind::$kind => self.$field.iter().map(Binding::plugin_id).collect(),)*
                }
            }

            /// Number of bindings for a kind
            pub fn count(&self, kind: EventKind) -> usize {
                match kind {
                    $(EventKind::$kind => self.$field.len(),)*
                }
            }

            /// Append another plugin's bindings, crediting all of them to
            /// `plugin_id` whatever the registrar claimed
            pub fn absorb(&mut self, plugin_id: &str, other: EventHandlers) {
                let plugin_id: Arc<str> = Arc::from(plugin_id);
                $(
                    self.$field.extend(other.$field.into_iter().map(|binding| Binding {
                        plugin_id: Arc::clone(&plugin_id),
                        handler: binding.handler,
                    }));
                )*
            }
        }

        $(
            impl Sealed for $payload {}

            impl EventPayload for $payload {
                const KIND: EventKind = EventKind::$kind;

                fn bindings(handlers: &EventHandlers) -> &[Binding<Self>] {
                    &handlers.$field
                }

                fn bindings_mut(handlers: &mut EventHandlers) -> &mut Vec<Binding<Self>> {
                    &mut handlers.$field
                }
            }
        )*
    };
}

event_catalogue! {
    server_starting: ServerStarting => ServerStarting,
    server_started: ServerStarted => ServerStarted,
    server_stopped: ServerStopped => ServerStopped,
    player_connected: PlayerConnected => PlayerConnected,
    player_disconnected: PlayerDisconnected => PlayerDisconnected,
    join_group: JoinGroup => JoinGroup,
    create_group: CreateGroup => CreateGroup,
    leave_group: LeaveGroup => LeaveGroup,
    microphone_packet: MicrophonePacketEvent => MicrophonePacket,
    locational_sound_packet: LocationalSoundPacketEvent => LocationalSoundPacket,
    entity_sound_packet: EntitySoundPacketEvent => EntitySoundPacket,
    static_sound_packet: StaticSoundPacketEvent => StaticSoundPacket,
    voice_host: VoiceHost => VoiceHost,
}

impl EventHandlers {
    /// Bindings for a payload type, in invocation order
    pub fn bindings<P: EventPayload>(&self) -> &[Binding<P>] {
        P::bindings(self)
    }

    /// Total number of bindings across all kinds
    pub fn len(&self) -> usize {
        EventKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            let ids = self.plugin_ids(kind);
            if !ids.is_empty() {
                map.entry(&kind.as_str(), &ids);
            }
        }
        map.finish()
    }
}

/// Collects event bindings from plugins during the registration phase.
///
/// # Example
///
/// ```
/// use murmur_plugin_api::{EventRegistrar, JoinGroup, VoiceHost};
///
/// let mut registrar = EventRegistrar::for_plugin("group-guard");
/// registrar.add_event::<JoinGroup, _>(|event| {
///     if event.payload().group.name == "staff" {
///         event.cancel();
///     }
/// });
/// registrar.add_event::<VoiceHost, _>(|event| {
///     event.payload_mut().set_voice_host("voice.example.com:24454");
/// });
///
/// let handlers = registrar.into_handlers();
/// assert_eq!(handlers.len(), 2);
/// ```
pub struct EventRegistrar {
    handlers: EventHandlers,
    current_plugin: Arc<str>,
}

impl EventRegistrar {
    pub fn new() -> Self {
        Self::for_plugin("host")
    }

    /// A registrar whose bindings are attributed to one plugin
    pub fn for_plugin(plugin_id: &str) -> Self {
        Self {
            handlers: EventHandlers::default(),
            current_plugin: Arc::from(plugin_id),
        }
    }

    /// Plugin that new bindings are attributed to
    pub fn current_plugin(&self) -> &str {
        &self.current_plugin
    }

    /// Bind an infallible handler to the payload's event kind
    pub fn add_event<P, F>(&mut self, handler: F)
    where
        P: EventPayload,
        F: Fn(&mut Event<P>) + Send + Sync + 'static,
    {
        self.try_add_event::<P, _>(move |event| {
            handler(event);
            Ok(())
        });
    }

    /// Bind a handler that may fail. Errors are logged by the host and do
    /// not stop the remaining handlers. A panic in the handler is caught
    /// and reported as [`PluginError::Panicked`].
    pub fn try_add_event<P, F>(&mut self, handler: F)
    where
        P: EventPayload,
        F: Fn(&mut Event<P>) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        tracing::debug!(
            plugin = %self.current_plugin,
            kind = %P::KIND,
            "Binding event handler"
        );
        P::bindings_mut(&mut self.handlers).push(Binding {
            plugin_id: Arc::clone(&self.current_plugin),
            handler: Box::new(move |event: &mut Event<P>| guarded(|| handler(event))),
        });
    }

    /// Bindings collected so far
    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    /// Finish registration and hand the collected bindings to the host
    pub fn into_handlers(self) -> EventHandlers {
        self.handlers
    }
}

impl Default for EventRegistrar {
    fn default() -> Self {
        Self::new()
    }
}
