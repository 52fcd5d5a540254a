//! Shared fixtures for the plugin pipeline tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use murmur_core::plugins::{ExtensionUnit, StaticUnit};
use murmur_plugin_api::{
    Connection, EventRegistrar, Group, HostApi, Plugin, PlayerId, PluginError, ServerApi,
};
use uuid::Uuid;

/// Ordered record of hook and handler calls across all plugins
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

type Registration = Arc<dyn Fn(&mut EventRegistrar, &Journal) + Send + Sync>;

/// Plugin whose hooks are scripted by the test
#[derive(Clone)]
pub struct ScriptedPlugin {
    id: String,
    journal: Journal,
    init_error: Option<String>,
    registration: Registration,
}

impl ScriptedPlugin {
    pub fn new(id: &str, journal: &Journal) -> Self {
        Self {
            id: id.to_string(),
            journal: journal.clone(),
            init_error: None,
            registration: Arc::new(|_, _| {}),
        }
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.init_error = Some(message.to_string());
        self
    }

    pub fn registers<F>(mut self, registration: F) -> Self
    where
        F: Fn(&mut EventRegistrar, &Journal) + Send + Sync + 'static,
    {
        self.registration = Arc::new(registration);
        self
    }
}

impl Plugin for ScriptedPlugin {
    fn plugin_id(&self) -> String {
        self.id.clone()
    }

    fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
        self.journal.record(format!("{}:init@{}", self.id, api.host_name()));
        match &self.init_error {
            Some(message) => Err(PluginError::custom(message.clone())),
            None => Ok(()),
        }
    }

    fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        self.journal.record(format!("{}:register", self.id));
        (self.registration)(registrar, &self.journal);
        Ok(())
    }
}

/// A unit exporting the given plugins
pub fn unit(id: &str, plugins: &[ScriptedPlugin]) -> Box<dyn ExtensionUnit> {
    let unit = plugins.iter().fold(StaticUnit::new(id), |unit, plugin| {
        let template = plugin.clone();
        unit.with_plugin(plugin.plugin_id(), move || Ok(Box::new(template.clone())))
    });
    Box::new(unit)
}

/// In-memory voice server with a fixed set of players and groups
#[derive(Default)]
pub struct FakeServer {
    connections: HashMap<PlayerId, Connection>,
    groups: Vec<Group>,
}

impl FakeServer {
    pub fn with_player(mut self, name: &str) -> Self {
        let player = Uuid::new_v4();
        self.connections.insert(player, Connection::new(player, name));
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn player(&self, name: &str) -> Connection {
        self.connections
            .values()
            .find(|c| c.name == name)
            .cloned()
            .unwrap()
    }

    pub fn shared(self) -> Arc<dyn ServerApi> {
        Arc::new(self)
    }
}

impl HostApi for FakeServer {
    fn host_name(&self) -> &str {
        "fake"
    }

    fn voice_distance(&self) -> f64 {
        32.0
    }
}

impl ServerApi for FakeServer {
    fn connection(&self, player: PlayerId) -> Option<Connection> {
        self.connections.get(&player).cloned()
    }

    fn group(&self, id: Uuid) -> Option<Group> {
        self.groups.iter().find(|g| g.id == id).cloned()
    }

    fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }
}
