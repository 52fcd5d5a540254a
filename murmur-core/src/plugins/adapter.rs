//! Host-adapter shims
//!
//! Each method builds one event from host state, dispatches it, and hands
//! back what the host has to act on: the cancellation flag for group and
//! packet events, or the override field for `ServerStarting` and
//! `VoiceHost`.

use std::sync::Arc;

use murmur_plugin_api::{
    Connection, CreateGroup, EntitySoundPacket, EntitySoundPacketEvent, Event, Group, JoinGroup,
    LeaveGroup, LocationalSoundPacket, LocationalSoundPacketEvent, MicrophonePacket,
    MicrophonePacketEvent, PlayerConnected, PlayerDisconnected, PlayerId, ServerApi,
    ServerStarted, ServerStarting, ServerStopped, StaticSoundPacket, StaticSoundPacketEvent,
    VoiceHost, VoiceSocket,
};

use super::manager::PluginManager;

/// An outgoing sound packet, in any of the shapes the server sends
#[derive(Debug, Clone)]
pub enum SoundPacket {
    Locational(LocationalSoundPacket),
    Entity(EntitySoundPacket),
    Static(StaticSoundPacket),
}

impl PluginManager {
    /// Ask plugins for a socket before the voice server binds.
    ///
    /// `None` means the host should use its built-in socket.
    pub fn socket_implementation(&self, api: &Arc<dyn ServerApi>) -> Option<Box<dyn VoiceSocket>> {
        let mut event = Event::new(Arc::clone(api), ServerStarting::default());
        self.dispatch(&mut event);

        let socket = event.payload_mut().take_socket_implementation();
        if socket.is_some() {
            tracing::info!("Using custom voice socket implementation");
        } else {
            tracing::info!("Using default voice socket implementation");
        }
        socket
    }

    /// Host a client should connect voice to, after plugin overrides
    pub fn voice_host(&self, api: &Arc<dyn ServerApi>, voice_host: &str) -> String {
        let mut event = Event::new(Arc::clone(api), VoiceHost::new(voice_host));
        self.dispatch(&mut event);
        event.into_payload().voice_host().to_string()
    }

    /// Like [`voice_host`](Self::voice_host), but `None` when no plugin
    /// changed the value
    pub fn voice_host_override(&self, api: &Arc<dyn ServerApi>, voice_host: &str) -> Option<String> {
        let resolved = self.voice_host(api, voice_host);
        (resolved != voice_host).then_some(resolved)
    }

    pub fn on_server_started(&self, api: &Arc<dyn ServerApi>) {
        self.dispatch(&mut Event::new(Arc::clone(api), ServerStarted));
    }

    pub fn on_server_stopped(&self, api: &Arc<dyn ServerApi>) {
        self.dispatch(&mut Event::new(Arc::clone(api), ServerStopped));
    }

    /// A player connected. Nothing is dispatched without a connection.
    pub fn on_player_connected(&self, api: &Arc<dyn ServerApi>, connection: Option<Connection>) {
        let Some(connection) = connection else {
            return;
        };
        self.dispatch(&mut Event::new(Arc::clone(api), PlayerConnected { connection }));
    }

    pub fn on_player_disconnected(&self, api: &Arc<dyn ServerApi>, player: PlayerId) {
        self.dispatch(&mut Event::new(Arc::clone(api), PlayerDisconnected { player }));
    }

    /// A player asks to join a group; no group means they leave theirs.
    ///
    /// Returns true when the host must refuse.
    pub fn on_join_group(
        &self,
        api: &Arc<dyn ServerApi>,
        connection: Connection,
        group: Option<Group>,
    ) -> bool {
        let Some(group) = group else {
            return self.on_leave_group(api, connection);
        };
        self.dispatch(&mut Event::new(Arc::clone(api), JoinGroup { group, connection }))
    }

    /// A player asks to create a group; no group means they leave theirs.
    ///
    /// Returns true when the host must refuse.
    pub fn on_create_group(
        &self,
        api: &Arc<dyn ServerApi>,
        connection: Connection,
        group: Option<Group>,
    ) -> bool {
        let Some(group) = group else {
            return self.on_leave_group(api, connection);
        };
        self.dispatch(&mut Event::new(Arc::clone(api), CreateGroup { group, connection }))
    }

    /// Returns true when the player must stay in their group
    pub fn on_leave_group(&self, api: &Arc<dyn ServerApi>, connection: Connection) -> bool {
        let group = connection.group.clone();
        self.dispatch(&mut Event::new(Arc::clone(api), LeaveGroup { group, connection }))
    }

    /// Returns true when the packet must be dropped
    pub fn on_mic_packet(
        &self,
        api: &Arc<dyn ServerApi>,
        sender: Connection,
        packet: MicrophonePacket,
    ) -> bool {
        self.dispatch(&mut Event::new(
            Arc::clone(api),
            MicrophonePacketEvent { packet, sender },
        ))
    }

    /// Route an outgoing sound packet to the event for its shape.
    ///
    /// Returns true when the packet must not be sent to `receiver`.
    pub fn on_sound_packet(
        &self,
        api: &Arc<dyn ServerApi>,
        sender: Option<Connection>,
        receiver: Connection,
        packet: SoundPacket,
    ) -> bool {
        let api = Arc::clone(api);
        match packet {
            SoundPacket::Locational(packet) => self.dispatch(&mut Event::new(
                api,
                LocationalSoundPacketEvent {
                    packet,
                    sender,
                    receiver,
                },
            )),
            SoundPacket::Entity(packet) => self.dispatch(&mut Event::new(
                api,
                EntitySoundPacketEvent {
                    packet,
                    sender,
                    receiver,
                },
            )),
            SoundPacket::Static(packet) => self.dispatch(&mut Event::new(
                api,
                StaticSoundPacketEvent {
                    packet,
                    sender,
                    receiver,
                },
            )),
        }
    }
}
