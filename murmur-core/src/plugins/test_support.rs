//! Scripted plugins shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use murmur_plugin_api::{EventRegistrar, HostApi, OfflineServer, Plugin, PluginError, ServerApi};

use super::discovery::{DiscoveredPlugin, ExtensionUnit, StaticUnit, discover_plugins};

type RegisterFn = Arc<dyn Fn(&mut EventRegistrar) -> Result<(), PluginError> + Send + Sync>;

/// Shared, ordered record of what handlers ran
pub(crate) type Trace = Arc<Mutex<Vec<String>>>;

pub(crate) fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

#[derive(Clone)]
pub(crate) struct TestPlugin {
    id: String,
    fail_init: bool,
    register: RegisterFn,
    init_calls: Arc<AtomicUsize>,
}

impl TestPlugin {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fail_init: false,
            register: Arc::new(|_| Ok(())),
            init_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub(crate) fn on_register<F>(mut self, register: F) -> Self
    where
        F: Fn(&mut EventRegistrar) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.register = Arc::new(register);
        self
    }

    pub(crate) fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

impl Plugin for TestPlugin {
    fn plugin_id(&self) -> String {
        self.id.clone()
    }

    fn initialize(&mut self, _api: &dyn HostApi) -> Result<(), PluginError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(PluginError::custom("init refused"));
        }
        Ok(())
    }

    fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        (self.register)(registrar)
    }
}

/// One static unit per plugin, unit id equal to the plugin id
pub(crate) fn units(plugins: &[TestPlugin]) -> Vec<Box<dyn ExtensionUnit>> {
    plugins
        .iter()
        .map(|plugin| {
            let template = plugin.clone();
            let unit = StaticUnit::new(plugin.id.clone())
                .with_plugin(plugin.id.clone(), move || Ok(Box::new(template.clone())));
            Box::new(unit) as Box<dyn ExtensionUnit>
        })
        .collect()
}

pub(crate) fn discovered(plugins: &[TestPlugin]) -> Vec<DiscoveredPlugin> {
    discover_plugins(&units(plugins), "host").0
}

pub(crate) fn server() -> Arc<dyn ServerApi> {
    Arc::new(OfflineServer::default())
}
