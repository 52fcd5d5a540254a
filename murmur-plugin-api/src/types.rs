//! Plain data carried by events: players, groups, positions and voice packets

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::error::PluginError;

/// Identifier of a player on the host server
pub type PlayerId = Uuid;

/// A point in the world, in block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// How members of a group hear players outside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Members hear each other and nearby non-members
    #[default]
    Normal,
    /// Non-members nearby also hear the group
    Open,
    /// Members hear only each other
    Isolated,
}

/// A voice chat group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub has_password: bool,
    pub persistent: bool,
    pub kind: GroupKind,
}

impl Group {
    /// Create a non-persistent, password-less group
    pub fn new(id: Uuid, name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            id,
            name: name.into(),
            has_password: false,
            persistent: false,
            kind,
        }
    }
}

/// A player's voice chat connection state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub player: PlayerId,
    pub name: String,
    pub group: Option<Group>,
    /// The player has an active voice connection
    pub connected: bool,
    /// The player muted voice chat entirely
    pub disabled: bool,
}

impl Connection {
    /// A connected player who is in no group
    pub fn new(player: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player,
            name: name.into(),
            group: None,
            connected: true,
            disabled: false,
        }
    }

    pub fn in_group(&self) -> bool {
        self.group.is_some()
    }
}

/// Audio captured by a player's microphone, as received by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrophonePacket {
    pub sender: PlayerId,
    /// Opus encoded audio frame
    pub opus_data: Vec<u8>,
    pub whispering: bool,
    pub sequence_number: u64,
}

/// Audio played at a fixed position in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationalSoundPacket {
    pub channel_id: Uuid,
    pub sender: PlayerId,
    pub position: Position,
    pub opus_data: Vec<u8>,
    pub distance: f32,
    pub category: Option<String>,
}

/// Audio attached to a moving entity, usually the speaking player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySoundPacket {
    pub channel_id: Uuid,
    pub sender: PlayerId,
    pub entity: Uuid,
    pub opus_data: Vec<u8>,
    pub whispering: bool,
    pub distance: f32,
    pub category: Option<String>,
}

/// Audio without a position, such as group voice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSoundPacket {
    pub channel_id: Uuid,
    pub sender: PlayerId,
    pub opus_data: Vec<u8>,
    pub category: Option<String>,
}

/// A datagram read from a [`VoiceSocket`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub data: Vec<u8>,
    pub source: SocketAddr,
    pub timestamp_ms: u64,
}

/// Transport used by the voice server.
///
/// Plugins may supply their own implementation through
/// [`ServerStarting`](crate::event::ServerStarting); the host falls back to
/// its built-in UDP socket when none is set.
pub trait VoiceSocket: Send {
    /// Bind the socket
    fn open(&mut self, port: u16, bind_address: &str) -> Result<(), PluginError>;

    /// Block until the next datagram arrives
    fn read(&mut self) -> Result<RawPacket, PluginError>;

    /// Send a datagram
    fn send(&mut self, data: &[u8], address: SocketAddr) -> Result<(), PluginError>;

    /// Port the socket is bound to, or 0 if unbound
    fn local_port(&self) -> u16;

    fn close(&mut self);

    fn is_closed(&self) -> bool;
}
