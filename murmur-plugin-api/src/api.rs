//! Capability handles - the slice of the host a plugin is allowed to touch

use uuid::Uuid;

use crate::API_VERSION;
use crate::types::{Connection, Group, PlayerId};

/// Handle passed to [`Plugin::initialize`](crate::Plugin::initialize).
///
/// Exposes host-wide information only. Anything tied to a running voice
/// server arrives later through [`ServerApi`] on each event.
pub trait HostApi: Send + Sync {
    /// Name of the host platform (e.g. "paper", "fabric")
    fn host_name(&self) -> &str;

    /// Plugin API version the host was built against
    fn api_version(&self) -> u32 {
        API_VERSION
    }

    /// Distance in blocks at which players hear each other
    fn voice_distance(&self) -> f64;
}

/// Handle scoped to a running voice server, carried by every [`Event`](crate::Event).
pub trait ServerApi: HostApi {
    /// Voice connection of an online player
    fn connection(&self, player: PlayerId) -> Option<Connection>;

    /// Look up a group by id
    fn group(&self, id: Uuid) -> Option<Group>;

    /// All groups currently known to the server
    fn groups(&self) -> Vec<Group>;

    /// Distance at which "broadcast" audio is still heard
    fn broadcast_range(&self) -> f64 {
        self.voice_distance()
    }
}

/// A server with no players and no groups.
///
/// Used by hosts that need to run the plugin pipeline outside a live game
/// server, such as the CLI's inspection commands.
#[derive(Debug, Clone)]
pub struct OfflineServer {
    host_name: String,
    voice_distance: f64,
}

impl OfflineServer {
    pub fn new(host_name: impl Into<String>, voice_distance: f64) -> Self {
        Self {
            host_name: host_name.into(),
            voice_distance,
        }
    }
}

impl Default for OfflineServer {
    fn default() -> Self {
        Self::new("offline", 48.0)
    }
}

impl HostApi for OfflineServer {
    fn host_name(&self) -> &str {
        &self.host_name
    }

    fn voice_distance(&self) -> f64 {
        self.voice_distance
    }
}

impl ServerApi for OfflineServer {
    fn connection(&self, _player: PlayerId) -> Option<Connection> {
        None
    }

    fn group(&self, _id: Uuid) -> Option<Group> {
        None
    }

    fn groups(&self) -> Vec<Group> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_server_is_empty() {
        let server = OfflineServer::default();
        assert_eq!(server.host_name(), "offline");
        assert_eq!(server.api_version(), API_VERSION);
        assert!(server.connection(Uuid::nil()).is_none());
        assert!(server.groups().is_empty());
    }

    #[test]
    fn test_broadcast_range_defaults_to_voice_distance() {
        let server = OfflineServer::new("test", 32.0);
        assert_eq!(server.broadcast_range(), 32.0);
    }

    #[test]
    fn test_server_api_is_object_safe() {
        fn _takes_boxed(_: Box<dyn ServerApi>) {}
        fn _takes_host(_: &dyn HostApi) {}
    }
}
