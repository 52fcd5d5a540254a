//! The event envelope and the closed catalogue of event payloads.
//!
//! Every event is an [`Event<P>`]: a cancellable envelope holding the
//! server handle and one payload type from the catalogue below. The set of
//! payload types is closed; [`EventPayload`] is sealed and each payload
//! maps to exactly one [`EventKind`].
//!
//! | Kind | Cancellable | Read back by the host |
//! |---|---|---|
//! | `server_starting` | no | socket override |
//! | `server_started`, `server_stopped` | no | - |
//! | `player_connected`, `player_disconnected` | no | - |
//! | `join_group`, `create_group`, `leave_group` | yes | - |
//! | `*_packet` | yes | - |
//! | `voice_host` | no | voice host override |

use std::fmt;
use std::sync::Arc;

use crate::api::ServerApi;
use crate::registrar::{Binding, EventHandlers};
use crate::types::{
    Connection, EntitySoundPacket, Group, LocationalSoundPacket, MicrophonePacket, PlayerId,
    StaticSoundPacket, VoiceSocket,
};

// ─── Event kinds ─────────────────────────────────────────────────────

/// Tag identifying one canonical event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    ServerStarting,
    ServerStarted,
    ServerStopped,
    PlayerConnected,
    PlayerDisconnected,
    JoinGroup,
    CreateGroup,
    LeaveGroup,
    MicrophonePacket,
    LocationalSoundPacket,
    EntitySoundPacket,
    StaticSoundPacket,
    VoiceHost,
}

impl EventKind {
    /// Every kind, in catalogue order
    pub const ALL: [EventKind; 13] = [
        EventKind::ServerStarting,
        EventKind::ServerStarted,
        EventKind::ServerStopped,
        EventKind::PlayerConnected,
        EventKind::PlayerDisconnected,
        EventKind::JoinGroup,
        EventKind::CreateGroup,
        EventKind::LeaveGroup,
        EventKind::MicrophonePacket,
        EventKind::LocationalSoundPacket,
        EventKind::EntitySoundPacket,
        EventKind::StaticSoundPacket,
        EventKind::VoiceHost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ServerStarting => "server_starting",
            EventKind::ServerStarted => "server_started",
            EventKind::ServerStopped => "server_stopped",
            EventKind::PlayerConnected => "player_connected",
            EventKind::PlayerDisconnected => "player_disconnected",
            EventKind::JoinGroup => "join_group",
            EventKind::CreateGroup => "create_group",
            EventKind::LeaveGroup => "leave_group",
            EventKind::MicrophonePacket => "microphone_packet",
            EventKind::LocationalSoundPacket => "locational_sound_packet",
            EventKind::EntitySoundPacket => "entity_sound_packet",
            EventKind::StaticSoundPacket => "static_sound_packet",
            EventKind::VoiceHost => "voice_host",
        }
    }

    /// Whether a handler may cancel events of this kind.
    ///
    /// Cancelling a group event aborts the state transition; cancelling a
    /// packet event drops the packet.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            EventKind::JoinGroup
                | EventKind::CreateGroup
                | EventKind::LeaveGroup
                | EventKind::MicrophonePacket
                | EventKind::LocationalSoundPacket
                | EventKind::EntitySoundPacket
                | EventKind::StaticSoundPacket
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Payload trait ───────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// A payload type from the event catalogue.
///
/// Sealed: only the payloads defined in this module implement it.
pub trait EventPayload: Sealed + Sized + 'static {
    const KIND: EventKind;

    #[doc(hidden)]
    fn bindings(handlers: &EventHandlers) -> &[Binding<Self>];

    #[doc(hidden)]
    fn bindings_mut(handlers: &mut EventHandlers) -> &mut Vec<Binding<Self>>;
}

// ─── Envelope ────────────────────────────────────────────────────────

/// A mutable event passed through every handler bound to its kind.
///
/// Built by the host right before dispatch and read back right after.
pub struct Event<P> {
    api: Arc<dyn ServerApi>,
    payload: P,
    cancelled: bool,
}

impl<P: EventPayload> Event<P> {
    pub fn new(api: Arc<dyn ServerApi>, payload: P) -> Self {
        Self {
            api,
            payload,
            cancelled: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        P::KIND
    }

    /// Handle to the server this event belongs to
    pub fn api(&self) -> &dyn ServerApi {
        self.api.as_ref()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub fn is_cancellable(&self) -> bool {
        P::KIND.is_cancellable()
    }

    /// Cancel the event.
    ///
    /// Returns `false` and leaves the event untouched if its kind is not
    /// cancellable. Once cancelled, an event stays cancelled.
    pub fn cancel(&mut self) -> bool {
        if !self.is_cancellable() {
            return false;
        }
        self.cancelled = true;
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl<P: fmt::Debug> fmt::Debug for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("host", &self.api.host_name())
            .field("payload", &self.payload)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// The voice server is about to bind its socket.
///
/// A handler may install its own [`VoiceSocket`]; the host reads it back
/// after dispatch and uses its default socket when none was set.
#[derive(Default)]
pub struct ServerStarting {
    socket: Option<Box<dyn VoiceSocket>>,
}

impl ServerStarting {
    pub fn socket_implementation(&self) -> Option<&dyn VoiceSocket> {
        self.socket.as_deref()
    }

    pub fn set_socket_implementation(&mut self, socket: impl VoiceSocket + 'static) {
        self.socket = Some(Box::new(socket));
    }

    pub fn take_socket_implementation(&mut self) -> Option<Box<dyn VoiceSocket>> {
        self.socket.take()
    }
}

impl fmt::Debug for ServerStarting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerStarting")
            .field("custom_socket", &self.socket.is_some())
            .finish()
    }
}

/// The voice server is listening
#[derive(Debug, Clone, Default)]
pub struct ServerStarted;

/// The voice server shut down
#[derive(Debug, Clone, Default)]
pub struct ServerStopped;

// ─── Connections ─────────────────────────────────────────────────────

/// A player's voice client connected
#[derive(Debug, Clone)]
pub struct PlayerConnected {
    pub connection: Connection,
}

/// A player's voice client disconnected
#[derive(Debug, Clone)]
pub struct PlayerDisconnected {
    pub player: PlayerId,
}

// ─── Groups ──────────────────────────────────────────────────────────

/// A player is about to join a group. Cancel to keep them out.
#[derive(Debug, Clone)]
pub struct JoinGroup {
    pub group: Group,
    pub connection: Connection,
}

/// A player is about to create a group. Cancel to prevent it.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub group: Group,
    pub connection: Connection,
}

/// A player is about to leave their group. Cancel to keep them in.
#[derive(Debug, Clone)]
pub struct LeaveGroup {
    /// The group being left, if the host still knows it.
    ///
    /// The host adapter fills this from the connection's current group;
    /// older hosts always sent it empty.
    pub group: Option<Group>,
    pub connection: Connection,
}

// ─── Packets ─────────────────────────────────────────────────────────

/// A microphone packet arrived from a player. Cancel to drop it.
#[derive(Debug, Clone)]
pub struct MicrophonePacketEvent {
    pub packet: MicrophonePacket,
    pub sender: Connection,
}

/// The server is about to send a locational sound packet. Cancel to drop it.
#[derive(Debug, Clone)]
pub struct LocationalSoundPacketEvent {
    pub packet: LocationalSoundPacket,
    /// Absent when the audio does not come from a player
    pub sender: Option<Connection>,
    pub receiver: Connection,
}

/// The server is about to send an entity sound packet. Cancel to drop it.
#[derive(Debug, Clone)]
pub struct EntitySoundPacketEvent {
    pub packet: EntitySoundPacket,
    pub sender: Option<Connection>,
    pub receiver: Connection,
}

/// The server is about to send a static sound packet. Cancel to drop it.
#[derive(Debug, Clone)]
pub struct StaticSoundPacketEvent {
    pub packet: StaticSoundPacket,
    pub sender: Option<Connection>,
    pub receiver: Connection,
}

// ─── Host overrides ──────────────────────────────────────────────────

/// The server is about to tell a client which host to connect voice to.
///
/// The host reads the value back after dispatch and applies it only if it
/// differs from the one it passed in.
#[derive(Debug, Clone)]
pub struct VoiceHost {
    voice_host: String,
}

impl VoiceHost {
    pub fn new(voice_host: impl Into<String>) -> Self {
        Self {
            voice_host: voice_host.into(),
        }
    }

    pub fn voice_host(&self) -> &str {
        &self.voice_host
    }

    pub fn set_voice_host(&mut self, voice_host: impl Into<String>) {
        self.voice_host = voice_host.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OfflineServer;
    use uuid::Uuid;

    fn api() -> Arc<dyn ServerApi> {
        Arc::new(OfflineServer::default())
    }

    fn connection() -> Connection {
        Connection::new(Uuid::nil(), "alice")
    }

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<&str> = EventKind::ALL.iter().map(EventKind::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_cancellable_kinds() {
        assert!(EventKind::JoinGroup.is_cancellable());
        assert!(EventKind::StaticSoundPacket.is_cancellable());
        assert!(!EventKind::ServerStarting.is_cancellable());
        assert!(!EventKind::PlayerConnected.is_cancellable());
        assert!(!EventKind::VoiceHost.is_cancellable());
    }

    #[test]
    fn test_event_kind_comes_from_payload() {
        let event = Event::new(api(), VoiceHost::new("voice.example.com"));
        assert_eq!(event.kind(), EventKind::VoiceHost);
        assert_eq!(event.kind().to_string(), "voice_host");
    }

    #[test]
    fn test_cancel_cancellable_event() {
        let group = Group::new(Uuid::new_v4(), "lobby", Default::default());
        let mut event = Event::new(
            api(),
            JoinGroup {
                group,
                connection: connection(),
            },
        );
        assert!(!event.is_cancelled());
        assert!(event.cancel());
        assert!(event.is_cancelled());
        // Cancelling twice keeps it cancelled
        assert!(event.cancel());
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_cancel_is_refused_for_notifications() {
        let mut event = Event::new(
            api(),
            PlayerConnected {
                connection: connection(),
            },
        );
        assert!(!event.cancel());
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_voice_host_override_round_trip() {
        let mut event = Event::new(api(), VoiceHost::new("default:24454"));
        event.payload_mut().set_voice_host("proxy:24454");
        assert_eq!(event.into_payload().voice_host(), "proxy:24454");
    }

    #[test]
    fn test_server_starting_without_socket() {
        let mut starting = ServerStarting::default();
        assert!(starting.socket_implementation().is_none());
        assert!(starting.take_socket_implementation().is_none());
        assert!(format!("{:?}", starting).contains("custom_socket: false"));
    }
}
